//! Sliding one-second window strobe detector.
//!
//! A flash is any frame-to-frame luminance change above 10% absolute, in
//! either direction. The window is measured in frames (`fps`), assuming a
//! constant frame rate.

use std::collections::VecDeque;

use crate::rules::{ids, RiskEvent, RiskLevel};

/// Minimum absolute luminance delta counted as a flash.
pub const FLASH_DELTA: f64 = 0.10;
pub const DEFAULT_FLASH_LIMIT: usize = 3;
pub const DYNAMIC_STROBE_SCORE: u32 = 100;

#[derive(Debug, Clone)]
pub struct FlashDetector {
    fps: u32,
    limit: usize,
    last_lum: f64,
    /// Frame indices of flashes still inside the window, oldest first.
    flash_frames: VecDeque<u64>,
}

impl FlashDetector {
    pub fn new(fps: u32, limit: usize) -> Self {
        Self { fps, limit, last_lum: 0.0, flash_frames: VecDeque::new() }
    }

    pub fn with_fps(fps: u32) -> Self {
        Self::new(fps, DEFAULT_FLASH_LIMIT)
    }

    /// Number of flashes currently inside the window.
    pub fn flashes_in_window(&self) -> usize {
        self.flash_frames.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Feed one frame. Returns a `DynamicStrobe` event whenever the window
    /// holds more than `limit` flashes; state is never reset.
    pub fn process_frame(&mut self, frame_idx: u64, lum: f64) -> Option<RiskEvent> {
        let delta = (lum - self.last_lum).abs();
        self.last_lum = lum;

        let window = u64::from(self.fps);
        while let Some(&oldest) = self.flash_frames.front() {
            if frame_idx.saturating_sub(oldest) > window {
                self.flash_frames.pop_front();
            } else {
                break;
            }
        }

        if delta > FLASH_DELTA {
            self.flash_frames.push_back(frame_idx);
        }

        let rate = self.flash_frames.len();
        if rate <= self.limit {
            return None;
        }

        Some(RiskEvent {
            rule_id: ids::DYNAMIC_STROBE.to_string(),
            risk_level: RiskLevel::Critical,
            score: DYNAMIC_STROBE_SCORE,
            context: format!("Measured {rate} flashes/sec (Limit {})", self.limit),
            line: 0,
            variables: vec!["screen_luminance".to_string()],
            source_type: "Dynamic".to_string(),
            timecode: (self.fps > 0).then(|| frame_idx as f64 / f64::from(self.fps)),
        })
    }
}

impl Default for FlashDetector {
    fn default() -> Self {
        Self::new(60, DEFAULT_FLASH_LIMIT)
    }
}
