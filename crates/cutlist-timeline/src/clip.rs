//! Clip entries: one trim instruction against one source file.

use cutlist_core::{CutlistError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single trim record in the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipEntry {
    /// Start of the retained segment, in nanoseconds from the start of the source.
    pub in_point: u64,
    /// End of the retained segment, in nanoseconds from the start of the source.
    pub out_point: u64,
    /// Source file, relative to the media directory. Never empty, never contains whitespace.
    pub source_path: String,
}

impl ClipEntry {
    /// Create a new entry, validating the source path.
    pub fn new(in_point: u64, out_point: u64, source_path: impl Into<String>) -> Result<Self> {
        let source_path = source_path.into();
        validate_source_path(&source_path)?;
        Ok(Self {
            in_point,
            out_point,
            source_path,
        })
    }

    /// An entry with no marks yet (`0 0 <file>`).
    pub fn unmarked(source_path: impl Into<String>) -> Result<Self> {
        Self::new(0, 0, source_path)
    }

    /// Retained duration, or `None` if the out point is not after the in point.
    pub fn duration(&self) -> Option<u64> {
        self.out_point
            .checked_sub(self.in_point)
            .filter(|&duration| duration > 0)
    }

    /// Parse one persisted line. `line` is 1-based and only used in errors.
    pub(crate) fn parse_line(line: usize, text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        let [in_field, out_field, path] = fields.as_slice() else {
            let message = if fields.len() < 3 {
                format!("expected '<in> <out> <path>', found {} field(s)", fields.len())
            } else {
                format!(
                    "expected 3 fields, found {}; source paths must not contain whitespace",
                    fields.len()
                )
            };
            return Err(CutlistError::Parse { line, message });
        };

        let in_point = parse_ns(line, "in point", in_field)?;
        let out_point = parse_ns(line, "out point", out_field)?;
        Ok(Self {
            in_point,
            out_point,
            source_path: (*path).to_string(),
        })
    }
}

/// Persisted form: `<in> <out> <path>`.
impl fmt::Display for ClipEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.in_point, self.out_point, self.source_path)
    }
}

fn parse_ns(line: usize, what: &str, field: &str) -> Result<u64> {
    field.parse::<u64>().map_err(|_| CutlistError::Parse {
        line,
        message: format!("{what} '{field}' is not a non-negative integer"),
    })
}

fn validate_source_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CutlistError::InvalidParameter(
            "source path must not be empty".into(),
        ));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(CutlistError::InvalidParameter(format!(
            "source path '{path}' must not contain whitespace"
        )));
    }
    Ok(())
}
