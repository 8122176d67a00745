//! Document chunking for manualqa.

pub mod window;

pub use window::WindowChunker;
