//! Automaton file format auto-detection

use super::args::SerializationFormat;
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;

/// Detected format with confidence level
#[derive(Debug)]
pub struct FormatDetection {
    /// Detected or specified serialization format
    pub format: SerializationFormat,
    /// Detection method used
    pub method: DetectionMethod,
}

/// Method used to detect the file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Heuristic detection via file extension
    Extension,
    /// Heuristic detection via file content analysis
    Content,
    /// User explicitly specified
    UserSpecified,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extension => write!(f, "heuristic (file extension)"),
            Self::Content => write!(f, "heuristic (content analysis)"),
            Self::UserSpecified => write!(f, "user specified"),
        }
    }
}

/// Detect the format of an existing automaton file.
pub fn detect_format(
    path: &Path,
    user_format: Option<SerializationFormat>,
) -> Result<FormatDetection> {
    if let Some(format) = user_format {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::UserSpecified,
        });
    }

    if let Some(format) = format_from_extension(path) {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::Extension,
        });
    }

    detect_by_content(path)
}

/// Pick the format for a file about to be written.
///
/// Falls back to JSON when neither the user nor the extension decides.
pub fn output_format(path: &Path, user_format: Option<SerializationFormat>) -> SerializationFormat {
    user_format
        .or_else(|| format_from_extension(path))
        .unwrap_or(SerializationFormat::Json)
}

fn format_from_extension(path: &Path) -> Option<SerializationFormat> {
    let ext = path.extension().and_then(|s| s.to_str())?;
    match ext.to_lowercase().as_str() {
        "txt" | "text" | "fsm" => Some(SerializationFormat::Text),
        "bin" | "bincode" => Some(SerializationFormat::Bincode),
        "json" => Some(SerializationFormat::Json),
        _ => None,
    }
}

/// Detect format by analyzing the first bytes of the file
fn detect_by_content(path: &Path) -> Result<FormatDetection> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut header = [0u8; 16];
    let bytes_read = file
        .read(&mut header)
        .with_context(|| format!("Failed to read file header: {}", path.display()))?;

    if bytes_read == 0 {
        bail!("File is empty: {}", path.display());
    }

    let first = header[..bytes_read]
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace());

    let format = match first {
        Some(b'{') => SerializationFormat::Json,
        // Edge lists open with a comment or the `initial` line
        Some(b'#') | Some(b'i') => SerializationFormat::Text,
        _ => SerializationFormat::Bincode,
    };

    Ok(FormatDetection {
        format,
        method: DetectionMethod::Content,
    })
}
