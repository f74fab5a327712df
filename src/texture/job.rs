//! Background texture generation
//!
//! Pixel data is produced on a worker thread and handed back over a
//! channel that the UI thread polls once per frame.

use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture generation was cancelled")]
    Cancelled,
    #[error("texture generation failed: {0}")]
    Generation(String),
    #[error("texture worker stopped without a result")]
    Disconnected,
}

/// Shared flag a generator checks to stop early
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

pub enum JobStatus {
    Running,
    Finished(Result<RgbaImage, TextureError>),
}

pub struct TextureJob {
    receiver: Receiver<Result<RgbaImage, TextureError>>,
    cancel: CancelToken,
}

impl TextureJob {
    pub fn spawn<F>(generate: F) -> Self
    where
        F: FnOnce(&CancelToken) -> Result<RgbaImage, TextureError> + Send + 'static,
    {
        let (sender, receiver) = channel();
        let cancel = CancelToken::default();
        let token = cancel.clone();

        thread::spawn(move || {
            let result = generate(&token);
            // Receiver is gone if the owner was evicted meanwhile
            let _ = sender.send(result);
        });

        Self { receiver, cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn poll(&mut self) -> JobStatus {
        match self.receiver.try_recv() {
            Ok(_) if self.is_cancelled() => JobStatus::Finished(Err(TextureError::Cancelled)),
            Ok(result) => JobStatus::Finished(result),
            Err(TryRecvError::Empty) => JobStatus::Running,
            Err(TryRecvError::Disconnected) => JobStatus::Finished(Err(TextureError::Disconnected)),
        }
    }
}
