//! Dynamic phase: render a preset for a fixed frame budget and watch the
//! luminance stream for strobing.

pub mod driver;
pub mod flash;
pub mod renderer;

pub use driver::{scan_dynamic, DynamicScan, RenderStats};
pub use flash::FlashDetector;
pub use renderer::{MockRenderer, MockMode, Renderer};
