//! Editing session: the surface a player talks to.
//!
//! The session owns the playlist store, a cursor and the undo history. It
//! never trusts its in-memory copy of the playlist: every lookup, navigation
//! and edit reloads the file first, so changes made by hand in a text editor
//! between calls are picked up. Every edit is saved immediately.

use cutlist_core::{CutlistError, ProjectConfig, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::clip::ClipEntry;
use crate::edit::{EditCommand, TrimPoint, UndoStack};
use crate::navigator;
use crate::playlist::Playlist;
use crate::store::PlaylistStore;

/// Source of the current playback position, supplied by the player.
pub trait PlaybackClock {
    /// Current position in the loaded clip, in nanoseconds.
    fn current_playback_position_ns(&self) -> u64;
}

impl<F> PlaybackClock for F
where
    F: Fn() -> u64,
{
    fn current_playback_position_ns(&self) -> u64 {
        self()
    }
}

/// A cursor over a persisted playlist.
#[derive(Debug)]
pub struct EditSession {
    store: PlaylistStore,
    media_dir: PathBuf,
    playlist: Playlist,
    current: usize,
    history: UndoStack,
}

impl EditSession {
    /// Open a session, loading the playlist once to make sure it is readable.
    pub fn open(store: PlaylistStore, media_dir: impl Into<PathBuf>) -> Result<Self> {
        let playlist = store.load()?;
        info!(
            path = %store.path().display(),
            entries = playlist.len(),
            "Opened edit session"
        );
        Ok(Self {
            store,
            media_dir: media_dir.into(),
            playlist,
            current: 0,
            history: UndoStack::default(),
        })
    }

    /// Open the session described by a project config.
    pub fn from_config(config: &ProjectConfig) -> Result<Self> {
        Self::open(
            PlaylistStore::new(config.playlist_path()),
            config.media_dir.clone(),
        )
    }

    /// Re-read the playlist from disk and renormalise the cursor.
    pub fn reload(&mut self) -> Result<&Playlist> {
        self.playlist = self.store.load()?;
        let len = self.playlist.len();
        if len == 0 {
            self.current = 0;
        } else if self.current >= len {
            let wrapped = self.current % len;
            warn!(
                from = self.current,
                to = wrapped,
                entries = len,
                "Playlist shrank, cursor wrapped"
            );
            self.current = wrapped;
        }
        Ok(&self.playlist)
    }

    /// The playlist as of the last reload.
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn store(&self) -> &PlaylistStore {
        &self.store
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Index of the current entry.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of entries, after reloading.
    pub fn entry_count(&mut self) -> Result<usize> {
        Ok(self.reload()?.len())
    }

    /// Entry at `index`, after reloading.
    pub fn entry(&mut self, index: usize) -> Result<ClipEntry> {
        self.reload()?.get(index).cloned()
    }

    /// The current entry, after reloading.
    pub fn current_entry(&mut self) -> Result<ClipEntry> {
        if self.reload()?.is_empty() {
            return Err(CutlistError::EmptyPlaylist);
        }
        self.playlist.get(self.current).cloned()
    }

    /// Absolute path of the source file for `index`, for the player to load.
    pub fn source_path(&mut self, index: usize) -> Result<PathBuf> {
        let entry = self.entry(index)?;
        Ok(self.media_dir.join(entry.source_path))
    }

    /// Move the cursor to `index`, returning the entry there.
    pub fn seek_to(&mut self, index: usize) -> Result<ClipEntry> {
        let entry = self.entry(index)?;
        self.current = index;
        Ok(entry)
    }

    /// Advance to the next entry, wrapping at the end.
    ///
    /// The returned entry tells the player which file to load and where to seek.
    pub fn next(&mut self) -> Result<ClipEntry> {
        let len = self.reload()?.len();
        self.current = navigator::next(self.current, len)?;
        self.playlist.get(self.current).cloned()
    }

    /// Step back to the previous entry, wrapping at the start.
    pub fn prev(&mut self) -> Result<ClipEntry> {
        let len = self.reload()?.len();
        self.current = navigator::prev(self.current, len)?;
        self.playlist.get(self.current).cloned()
    }

    /// Set the in point of `index` and save.
    pub fn set_in_point(&mut self, index: usize, position_ns: u64) -> Result<()> {
        self.edit(index, TrimPoint::In, position_ns)
    }

    /// Set the out point of `index` and save.
    pub fn set_out_point(&mut self, index: usize, position_ns: u64) -> Result<()> {
        self.edit(index, TrimPoint::Out, position_ns)
    }

    /// Mark the in point of the current entry at the player's position.
    pub fn mark_in(&mut self, clock: &impl PlaybackClock) -> Result<()> {
        let position = clock.current_playback_position_ns();
        self.set_in_point(self.current, position)
    }

    /// Mark the out point of the current entry at the player's position.
    pub fn mark_out(&mut self, clock: &impl PlaybackClock) -> Result<()> {
        let position = clock.current_playback_position_ns();
        self.set_out_point(self.current, position)
    }

    /// Undo the last edit made in this session. Returns false if there was none.
    ///
    /// The edit stays undoable if the playlist cannot be read or no longer has
    /// the entry.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(inverse) = self.history.next_undo() else {
            return Ok(false);
        };
        self.replay(&inverse)?;
        self.history.commit_undo();
        Ok(true)
    }

    /// Redo the last undone edit. Returns false if there was none.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(command) = self.history.next_redo().cloned() else {
            return Ok(false);
        };
        self.replay(&command)?;
        self.history.commit_redo();
        Ok(true)
    }

    fn replay(&mut self, command: &EditCommand) -> Result<()> {
        self.reload()?;
        command.apply(&mut self.playlist)?;
        self.store.save(&self.playlist)?;
        info!(?command, "History step applied");
        Ok(())
    }

    fn edit(&mut self, index: usize, point: TrimPoint, position_ns: u64) -> Result<()> {
        self.reload()?;
        let command = EditCommand::execute(&mut self.playlist, index, point, position_ns)?;
        self.store.save(&self.playlist)?;
        info!(index, ?point, position_ns, "Trim point updated");
        self.history.record(command);
        Ok(())
    }
}
