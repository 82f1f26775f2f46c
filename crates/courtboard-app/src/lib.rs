//! Courtboard Application
//!
//! Loads a saved play (or builds a demo one) and plays its animation
//! headlessly, logging each frame.

mod app;
mod demo;

pub use app::{App, AppConfig, AppError, Cli, PlaybackSummary, PlaySource};
pub use demo::demo_document;
