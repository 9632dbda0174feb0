//! Captured frames as handed over by the screen capture layer

use image::DynamicImage;
use std::collections::VecDeque;
use std::time::SystemTime;

use crate::error::{SpriteError, SpriteResult};
use crate::pixels::ColorImage;

/// A captured screen image plus the moment it was taken.
///
/// Matchers only ever read a frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: ColorImage,
    timestamp: Option<SystemTime>,
}

impl Frame {
    pub fn new(image: ColorImage, timestamp: Option<SystemTime>) -> Self {
        Self { image, timestamp }
    }

    /// Wrap a decoded capture, rejecting anything that is not 8-bit RGB or RGBA
    pub fn from_dynamic(image: DynamicImage, timestamp: Option<SystemTime>) -> SpriteResult<Self> {
        let image = ColorImage::try_from(image).map_err(|e| SpriteError::InvalidFrame {
            description: e.to_string(),
        })?;
        Ok(Self::new(image, timestamp))
    }

    /// Wrap an image captured right now
    pub fn captured_now(image: ColorImage) -> Self {
        Self::new(image, Some(SystemTime::now()))
    }

    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// The most recent frames of a polling loop, oldest first
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    frames: VecDeque<Frame>,
    capacity: usize,
}

impl FrameBuffer {
    pub const DEFAULT_CAPACITY: usize = 5;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a frame, evicting the oldest one when full
    pub fn add_frame(&mut self, frame: Frame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.back()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, RgbImage};
    use std::time::Duration;

    fn frame_at(secs: u64) -> Frame {
        let image = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        Frame::new(
            ColorImage::from(image),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)),
        )
    }

    #[test]
    fn test_from_dynamic_rejects_gray() {
        let gray = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(4, 4, Luma([0u8])));
        let err = Frame::from_dynamic(gray, None).unwrap_err();
        assert!(matches!(err, SpriteError::InvalidFrame { .. }));
    }

    #[test]
    fn test_from_dynamic_accepts_rgba() {
        let rgba = DynamicImage::new_rgba8(8, 6);
        let frame = Frame::from_dynamic(rgba, None).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
        assert_eq!(frame.image().channels(), 4);
        assert!(frame.timestamp().is_none());
    }

    #[test]
    fn test_captured_now_stamps_frame() {
        let before = SystemTime::now();
        let frame = Frame::captured_now(ColorImage::from(RgbImage::new(3, 2)));
        let after = SystemTime::now();

        let stamp = frame.timestamp().unwrap();
        assert!(before <= stamp && stamp <= after);
        assert_eq!((frame.width(), frame.height()), (3, 2));
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let mut buffer = FrameBuffer::new(3);
        assert!(buffer.is_empty());
        assert!(buffer.last_frame().is_none());

        for secs in 0..5 {
            buffer.add_frame(frame_at(secs));
        }

        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 3);
        let stamps: Vec<_> = buffer.frames().filter_map(|f| f.timestamp()).collect();
        assert_eq!(
            stamps,
            (2..5)
                .map(|s| SystemTime::UNIX_EPOCH + Duration::from_secs(s))
                .collect::<Vec<_>>()
        );
        assert_eq!(
            buffer.last_frame().and_then(|f| f.timestamp()),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(4))
        );
    }

    #[test]
    fn test_default_capacity() {
        let buffer = FrameBuffer::default();
        assert_eq!(buffer.capacity(), FrameBuffer::DEFAULT_CAPACITY);
        assert!(!buffer.is_full());
    }
}
