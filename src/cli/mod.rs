//! CLI interface for checksum-automata
//!
//! Provides command-line utilities for synthesizing, inspecting and
//! exporting checksum automata.

pub mod args;
pub mod commands;
pub mod detect;

pub use args::{Cli, Commands, SchemeArgs, SerializationFormat};
pub use detect::{detect_format, DetectionMethod, FormatDetection};
