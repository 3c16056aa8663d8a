//! Output formats the encoder can produce.
//!
//! The set is closed: `png`, `jpeg`, `gif`. Parsing is exact and
//! case-sensitive, matching what users pass to `--format`. The format name
//! doubles as the file extension of synthesized output paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported format: {0} (expected png, jpeg or gif)")]
pub struct UnsupportedFormat(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Gif];

    /// Canonical name, also used as the output file extension.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Gif => "gif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_names() {
        assert_eq!("png".parse(), Ok(OutputFormat::Png));
        assert_eq!("jpeg".parse(), Ok(OutputFormat::Jpeg));
        assert_eq!("gif".parse(), Ok(OutputFormat::Gif));
    }

    #[test]
    fn rejects_other_names() {
        for name in ["bmp", "jpg", "PNG", "", "webp"] {
            assert_eq!(
                name.parse::<OutputFormat>(),
                Err(UnsupportedFormat(name.to_string()))
            );
        }
    }

    #[test]
    fn default_is_png() {
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::Jpeg).unwrap(),
            "\"jpeg\""
        );
    }
}
