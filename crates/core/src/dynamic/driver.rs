use serde::{Deserialize, Serialize};

use super::flash::FlashDetector;
use super::renderer::Renderer;
use crate::rules::RiskEvent;

/// Luminance statistics over a render run. Ratios and the average are zero
/// when no frames were rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    pub frames: u64,
    pub avg_lum: f64,
    pub min_lum: f64,
    pub max_lum: f64,
    pub dark_ratio: f64,
    pub light_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicScan {
    /// At most one event: the first strobe detection of the run.
    pub events: Vec<RiskEvent>,
    pub stats: RenderStats,
}

/// Render `path` for `duration_sec * fps` frames through `renderer`, feeding
/// each frame's luminance to a [`FlashDetector`].
///
/// Only the first detection is kept, but rendering and statistics continue
/// for the full budget.
pub fn scan_dynamic(
    renderer: &mut dyn Renderer,
    path: &str,
    duration_sec: u32,
    fps: u32,
) -> DynamicScan {
    scan_dynamic_with(renderer, &mut FlashDetector::with_fps(fps), path, duration_sec, fps)
}

pub fn scan_dynamic_with(
    renderer: &mut dyn Renderer,
    detector: &mut FlashDetector,
    path: &str,
    duration_sec: u32,
    fps: u32,
) -> DynamicScan {
    renderer.load_preset(path);
    let total_frames = u64::from(duration_sec) * u64::from(fps);
    tracing::debug!(renderer = renderer.name(), path, total_frames, "starting render loop");

    let mut events = Vec::new();
    let mut total_lum = 0.0;
    let mut min_lum: f64 = 1.0;
    let mut max_lum: f64 = 0.0;
    let mut dark_frames = 0u64;
    let mut light_frames = 0u64;

    for frame in 0..total_frames {
        renderer.update_audio();
        let lum = renderer.render_frame();

        total_lum += lum;
        min_lum = min_lum.min(lum);
        max_lum = max_lum.max(lum);
        if lum < 0.1 {
            dark_frames += 1;
        } else if lum > 0.9 {
            light_frames += 1;
        }

        if let Some(event) = detector.process_frame(frame, lum) {
            if events.is_empty() {
                tracing::debug!(frame, context = %event.context, "strobe detected");
                events.push(event);
            }
        }
    }

    let ratio = |count: f64| if total_frames > 0 { count / total_frames as f64 } else { 0.0 };
    let stats = RenderStats {
        frames: total_frames,
        avg_lum: ratio(total_lum),
        min_lum,
        max_lum,
        dark_ratio: ratio(dark_frames as f64),
        light_ratio: ratio(light_frames as f64),
    };

    DynamicScan { events, stats }
}
