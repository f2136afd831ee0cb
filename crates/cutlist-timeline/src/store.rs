//! Playlist persistence.
//!
//! The playlist file is meant to be edited by hand while the engine runs, so
//! every save replaces the file atomically: the new text is written to a
//! temporary file in the same directory and renamed over the old one. A reader
//! sees either the previous contents or the new ones, never a partial write.

use cutlist_core::{CutlistError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::playlist::Playlist;

/// Reads and writes a playlist file.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    /// Create a store for the playlist at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the playlist file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the playlist from disk.
    pub fn load(&self) -> Result<Playlist> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CutlistError::NotFound(format!("playlist not found: {}", self.path.display()))
            } else {
                CutlistError::Io(e)
            }
        })?;
        let playlist = Playlist::parse(&text)?;
        debug!(path = %self.path.display(), entries = playlist.len(), "Loaded playlist");
        Ok(playlist)
    }

    /// Atomically replace the playlist file.
    ///
    /// Every line is written newline-terminated, so a file whose last line
    /// had no trailing newline gains one on its first save.
    pub fn save(&self, playlist: &Playlist) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(playlist.to_text().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| CutlistError::Io(e.error))?;

        info!(path = %self.path.display(), entries = playlist.len(), "Saved playlist");
        Ok(())
    }

    /// Write a playlist only if no file exists yet.
    pub fn create(&self, playlist: &Playlist) -> Result<()> {
        if self.exists() {
            return Err(CutlistError::InvalidParameter(format!(
                "playlist already exists: {}",
                self.path.display()
            )));
        }
        self.save(playlist)
    }
}
