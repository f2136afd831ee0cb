//! Cutlist Timeline - Playlist data model
//!
//! Implements the edit-decision-list side of cutlist:
//! - Clip entries and the ordered playlist
//! - Atomic persistence to the flat `playlist.tsv` format
//! - Trim point edits with undo/redo
//! - Wraparound navigation
//! - The editing session a player drives

pub mod clip;
pub mod edit;
pub mod navigator;
pub mod playlist;
pub mod session;
pub mod store;

pub use clip::ClipEntry;
pub use edit::{set_in_point, set_out_point, EditCommand, TrimPoint, UndoStack};
pub use playlist::Playlist;
pub use session::{EditSession, PlaybackClock};
pub use store::PlaylistStore;
