use std::f64::consts::PI;

/// Rendering capability consumed by the dynamic scan.
///
/// Production binds this to a real visualizer engine; [`MockRenderer`]
/// stands in for it without a GPU.
pub trait Renderer {
    fn load_preset(&mut self, path: &str);

    fn update_audio(&mut self) {}

    /// Render one frame and return its average luminance in `[0, 1]`.
    fn render_frame(&mut self) -> f64;

    /// Human-readable renderer name for logs.
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockMode {
    #[default]
    Safe,
    /// 15 Hz strobe at 60 fps.
    Strobe,
    /// 2.9 Hz square wave; each cycle is two flashes.
    Edge,
    /// Constant black.
    Blank,
}

/// Deterministic renderer. Unless built with [`MockRenderer::with_mode`],
/// its output is chosen from the preset path: `dynamic_fail` strobes,
/// `dynamic_edge` flashes near 3 Hz, anything else drifts gently around mid
/// grey.
#[derive(Debug, Default)]
pub struct MockRenderer {
    pub frame_count: u64,
    pub mode: MockMode,
    pinned: bool,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: MockMode) -> Self {
        Self { frame_count: 0, mode, pinned: true }
    }
}

impl Renderer for MockRenderer {
    fn load_preset(&mut self, path: &str) {
        self.frame_count = 0;
        if self.pinned {
            return;
        }
        self.mode = if path.contains("dynamic_fail") {
            MockMode::Strobe
        } else if path.contains("dynamic_edge") {
            MockMode::Edge
        } else {
            MockMode::Safe
        };
    }

    fn render_frame(&mut self) -> f64 {
        self.frame_count += 1;
        let t = self.frame_count as f64 / 60.0;

        match self.mode {
            MockMode::Safe => 0.5 + 0.1 * t.sin(),
            MockMode::Strobe => {
                if self.frame_count % 4 < 2 {
                    1.0
                } else {
                    0.0
                }
            }
            MockMode::Edge => {
                if (t * 2.9 * 2.0 * PI).sin() > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            MockMode::Blank => 0.0,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
