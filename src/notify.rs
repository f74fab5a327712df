//! User-facing notifications
//!
//! Errors and yes/no questions go through [`Notifier`] so the shell can be
//! driven without native dialogs in tests.

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

pub trait Notifier {
    fn error(&self, title: &str, message: &str);
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Native message boxes
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn error(&self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show();
        result == MessageDialogResult::Yes
    }
}

#[cfg(test)]
pub mod test_support {
    use super::Notifier;
    use std::cell::RefCell;

    /// Records messages and answers every question with `answer`
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub answer: bool,
        pub errors: RefCell<Vec<(String, String)>>,
        pub questions: RefCell<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn answering(answer: bool) -> Self {
            Self { answer, ..Self::default() }
        }
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, title: &str, message: &str) {
            self.errors.borrow_mut().push((title.to_string(), message.to_string()));
        }

        fn confirm(&self, _title: &str, message: &str) -> bool {
            self.questions.borrow_mut().push(message.to_string());
            self.answer
        }
    }

    impl Notifier for std::rc::Rc<RecordingNotifier> {
        fn error(&self, title: &str, message: &str) {
            self.as_ref().error(title, message)
        }

        fn confirm(&self, title: &str, message: &str) -> bool {
            self.as_ref().confirm(title, message)
        }
    }
}
