use vizscan_core::dynamic::driver::scan_dynamic_with;
use vizscan_core::dynamic::{scan_dynamic, FlashDetector, MockMode, MockRenderer, Renderer};

/// Replays a fixed luminance sequence, cycling when exhausted.
struct Scripted {
    frames: Vec<f64>,
    cursor: usize,
    loaded: Option<String>,
}

impl Scripted {
    fn new(frames: Vec<f64>) -> Self {
        Self { frames, cursor: 0, loaded: None }
    }
}

impl Renderer for Scripted {
    fn load_preset(&mut self, path: &str) {
        self.loaded = Some(path.to_string());
    }

    fn render_frame(&mut self) -> f64 {
        let lum = self.frames[self.cursor % self.frames.len()];
        self.cursor += 1;
        lum
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[test]
fn alternating_frames_produce_balanced_stats() {
    let mut renderer = Scripted::new(vec![0.0, 1.0]);
    let scan = scan_dynamic(&mut renderer, "alt.milk", 1, 60);

    assert_eq!(renderer.loaded.as_deref(), Some("alt.milk"));
    assert_eq!(renderer.cursor, 60);
    assert_eq!(scan.stats.frames, 60);
    assert!((scan.stats.avg_lum - 0.5).abs() < 1e-9);
    assert!((scan.stats.dark_ratio - 0.5).abs() < 1e-9);
    assert!((scan.stats.light_ratio - 0.5).abs() < 1e-9);
    assert_eq!(scan.stats.min_lum, 0.0);
    assert_eq!(scan.stats.max_lum, 1.0);
}

#[test]
fn only_first_detection_is_kept() {
    let mut renderer = Scripted::new(vec![0.0, 1.0]);
    let scan = scan_dynamic(&mut renderer, "alt.milk", 2, 60);
    assert_eq!(scan.events.len(), 1);
    assert_eq!(scan.events[0].rule_id, "DynamicStrobe");
}

#[test]
fn zero_duration_renders_nothing() {
    let mut renderer = Scripted::new(vec![1.0]);
    let scan = scan_dynamic(&mut renderer, "none.milk", 0, 60);
    assert!(scan.events.is_empty());
    assert_eq!(renderer.cursor, 0);
    assert_eq!(scan.stats.frames, 0);
    assert_eq!(scan.stats.avg_lum, 0.0);
    assert_eq!(scan.stats.dark_ratio, 0.0);
    assert_eq!(scan.stats.light_ratio, 0.0);
}

#[test]
fn mock_strobe_is_detected_early() {
    let mut renderer = MockRenderer::new();
    let scan = scan_dynamic(&mut renderer, "presets/dynamic_fail.milk", 5, 60);
    assert_eq!(renderer.mode, MockMode::Strobe);
    assert_eq!(renderer.frame_count, 300);
    assert_eq!(scan.events.len(), 1);

    let timecode = scan.events[0].timecode.expect("timecode");
    assert!(timecode < 1.0, "strobe should be caught within the first second");
}

#[test]
fn mock_safe_mode_stays_quiet() {
    let mut renderer = MockRenderer::new();
    let scan = scan_dynamic(&mut renderer, "presets/calm.milk", 5, 60);
    assert_eq!(renderer.mode, MockMode::Safe);
    assert!(scan.events.is_empty());
    assert!(scan.stats.min_lum > 0.3);
    assert!(scan.stats.max_lum < 0.7);
}

#[test]
fn explicit_mode_survives_load() {
    let mut renderer = MockRenderer::with_mode(MockMode::Blank);
    let scan = scan_dynamic(&mut renderer, "presets/dynamic_fail.milk", 1, 30);
    assert_eq!(renderer.mode, MockMode::Blank);
    assert!(scan.events.is_empty());
    assert_eq!(scan.stats.dark_ratio, 1.0);
    assert_eq!(scan.stats.max_lum, 0.0);
}

#[test]
fn strobe_mode_can_be_forced_on_any_path() {
    let mut renderer = MockRenderer::with_mode(MockMode::Strobe);
    let scan = scan_dynamic(&mut renderer, "presets/calm.milk", 1, 60);
    assert_eq!(scan.events.len(), 1);
}

#[test]
fn custom_detector_limit_is_honoured() {
    let mut renderer = Scripted::new(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    let mut strict = FlashDetector::new(60, 1);
    let scan = scan_dynamic_with(&mut renderer, &mut strict, "slow.milk", 1, 60);
    assert_eq!(scan.events.len(), 1);

    let mut renderer = Scripted::new(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    let mut lenient = FlashDetector::new(60, 100);
    let scan = scan_dynamic_with(&mut renderer, &mut lenient, "slow.milk", 1, 60);
    assert!(scan.events.is_empty());
}
