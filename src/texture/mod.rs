//! Keyed texture cache fed by background jobs
//!
//! Editors request a texture under their own id plus a name. Generation
//! runs off the UI thread; [`TextureLoader::poll`] turns finished images
//! into GPU textures on the UI thread. Closing an editor evicts its
//! entries and cancels anything still pending.

mod job;

pub use job::{CancelToken, JobStatus, TextureError, TextureJob};

use image::RgbaImage;
use macroquad::prelude::{FilterMode, Texture2D};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub owner: String,
    pub name: String,
}

impl TextureKey {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: owner.into(), name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    Missing,
    Loading,
    Ready,
    Failed,
}

enum TextureSlot<T> {
    Pending(TextureJob),
    Ready(T),
    Failed,
}

pub struct TextureLoader<T> {
    slots: HashMap<TextureKey, TextureSlot<T>>,
}

impl<T> TextureLoader<T> {
    pub fn new() -> Self {
        Self { slots: HashMap::new() }
    }

    /// Return the texture if ready, starting generation the first time a
    /// key is seen. Failed keys are not retried until evicted.
    pub fn request<F>(&mut self, key: &TextureKey, generate: F) -> Option<&T>
    where
        F: FnOnce(&CancelToken) -> Result<RgbaImage, TextureError> + Send + 'static,
    {
        let slot = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| TextureSlot::Pending(TextureJob::spawn(generate)));
        match slot {
            TextureSlot::Ready(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn get(&self, key: &TextureKey) -> Option<&T> {
        match self.slots.get(key) {
            Some(TextureSlot::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    pub fn state(&self, key: &TextureKey) -> TextureState {
        match self.slots.get(key) {
            None => TextureState::Missing,
            Some(TextureSlot::Pending(_)) => TextureState::Loading,
            Some(TextureSlot::Ready(_)) => TextureState::Ready,
            Some(TextureSlot::Failed) => TextureState::Failed,
        }
    }

    /// Collect finished jobs, converting their images with `upload`
    pub fn poll<U>(&mut self, mut upload: U)
    where
        U: FnMut(RgbaImage) -> T,
    {
        for (key, slot) in self.slots.iter_mut() {
            let TextureSlot::Pending(job) = slot else {
                continue;
            };
            match job.poll() {
                JobStatus::Running => {}
                JobStatus::Finished(Ok(image)) => *slot = TextureSlot::Ready(upload(image)),
                JobStatus::Finished(Err(e)) => {
                    log::warn!("Texture {}/{}: {}", key.owner, key.name, e);
                    *slot = TextureSlot::Failed;
                }
            }
        }
    }

    /// Drop every texture owned by `owner`, cancelling pending jobs
    pub fn evict_owner(&mut self, owner: &str) {
        self.slots.retain(|key, slot| {
            if key.owner != owner {
                return true;
            }
            if let TextureSlot::Pending(job) = slot {
                job.cancel();
            }
            false
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for TextureLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Upload generated pixels as a nearest-filtered GPU texture
pub fn upload(image: RgbaImage) -> Texture2D {
    let texture = Texture2D::from_rgba8(image.width() as u16, image.height() as u16, image.as_raw());
    texture.set_filter(FilterMode::Nearest);
    texture
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn poll_until_settled(loader: &mut TextureLoader<(u32, u32)>, key: &TextureKey) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while loader.state(key) == TextureState::Loading && Instant::now() < deadline {
            loader.poll(|image| image.dimensions());
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_request_generates_then_becomes_ready() {
        let mut loader = TextureLoader::new();
        let key = TextureKey::new("editor-1", "grid");

        assert!(loader.request(&key, |_| Ok(RgbaImage::new(4, 2))).is_none());
        assert_eq!(loader.state(&key), TextureState::Loading);

        poll_until_settled(&mut loader, &key);
        assert_eq!(loader.get(&key), Some(&(4, 2)));
        assert_eq!(loader.request(&key, |_| Ok(RgbaImage::new(1, 1))), Some(&(4, 2)));
    }

    #[test]
    fn test_failed_generation_is_remembered() {
        let mut loader: TextureLoader<(u32, u32)> = TextureLoader::new();
        let key = TextureKey::new("editor-1", "broken");
        loader.request(&key, |_| Err(TextureError::Generation("bad data".into())));
        poll_until_settled(&mut loader, &key);
        assert_eq!(loader.state(&key), TextureState::Failed);
    }

    #[test]
    fn test_evict_cancels_pending_and_keeps_other_owners() {
        let mut loader: TextureLoader<(u32, u32)> = TextureLoader::new();
        let (release, gate) = mpsc::channel::<()>();
        let (report, observed) = mpsc::channel::<bool>();

        let slow = TextureKey::new("closing", "slow");
        loader.request(&slow, move |token| {
            let _ = gate.recv();
            let _ = report.send(token.is_cancelled());
            Err(TextureError::Cancelled)
        });
        let other = TextureKey::new("staying", "grid");
        loader.request(&other, |_| Ok(RgbaImage::new(1, 1)));

        loader.evict_owner("closing");
        release.send(()).unwrap();

        assert!(observed.recv_timeout(Duration::from_secs(5)).unwrap());
        assert_eq!(loader.state(&slow), TextureState::Missing);
        assert_ne!(loader.state(&other), TextureState::Missing);
        assert_eq!(loader.len(), 1);
    }
}
