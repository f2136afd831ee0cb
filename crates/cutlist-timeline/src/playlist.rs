//! The playlist: an ordered sequence of clip entries.
//!
//! Insertion order is render order. The text form is one entry per line,
//! `<inPointNs> <outPointNs> <sourceRelativePath>`, with no header.

use cutlist_core::{format_timecode, CutlistError, Result};
use serde::{Deserialize, Serialize};

use crate::clip::ClipEntry;

/// An ordered list of trim records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    entries: Vec<ClipEntry>,
}

impl Playlist {
    /// Create an empty playlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a playlist from entries in render order.
    pub fn from_entries(entries: Vec<ClipEntry>) -> Self {
        Self { entries }
    }

    /// Parse the persisted text form.
    ///
    /// Blank lines are skipped; every other line must hold exactly three
    /// whitespace-separated fields.
    pub fn parse(text: &str) -> Result<Self> {
        let entries = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| ClipEntry::parse_line(i + 1, line))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Serialize to the persisted text form, one newline-terminated line per entry.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, or an `Index` error.
    pub fn get(&self, index: usize) -> Result<&ClipEntry> {
        let len = self.entries.len();
        self.entries
            .get(index)
            .ok_or(CutlistError::Index { index, len })
    }

    /// Mutable entry at `index`, or an `Index` error.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut ClipEntry> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(CutlistError::Index { index, len })
    }

    /// Append an entry at the end of the render order.
    pub fn push(&mut self, entry: ClipEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClipEntry> {
        self.entries.iter()
    }

    /// Human-readable listing with a `-->` marker on the current entry.
    pub fn listing(&self, current: Option<usize>) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let marker = if Some(i) == current { "-->" } else { "   " };
            out.push_str(&format!(
                "{marker} {i:>3}  {} - {}  {}\n",
                format_timecode(entry.in_point),
                format_timecode(entry.out_point),
                entry.source_path,
            ));
        }
        out
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a ClipEntry;
    type IntoIter = std::slice::Iter<'a, ClipEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
