//! Render gateway implementations.

pub mod console;
pub mod recording;

pub use console::ConsoleGateway;
pub use recording::{RecordingGateway, RenderCall};
