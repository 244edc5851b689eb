pub mod scan;
pub mod scoring;

pub use scan::*;
pub use scoring::*;
