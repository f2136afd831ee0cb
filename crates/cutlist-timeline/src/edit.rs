//! Trim point edits with undo/redo support.
//!
//! The free functions are the primitive mutations: they change exactly one
//! field of one entry and never persist. `EditCommand` records an edit together
//! with the value it replaced so it can be inverted, and `UndoStack` keeps the
//! history.

use cutlist_core::{CutlistError, Result};
use std::collections::VecDeque;
use tracing::debug;

use crate::playlist::Playlist;

// ── Primitive edits ─────────────────────────────────────────────

/// Which boundary of an entry an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimPoint {
    In,
    Out,
}

/// Set the in point of `playlist[index]`, returning the previous value.
///
/// The new value is not checked against the out point.
pub fn set_in_point(playlist: &mut Playlist, index: usize, position_ns: u64) -> Result<u64> {
    set_point(playlist, index, TrimPoint::In, position_ns)
}

/// Set the out point of `playlist[index]`, returning the previous value.
///
/// The new value is not checked against the in point.
pub fn set_out_point(playlist: &mut Playlist, index: usize, position_ns: u64) -> Result<u64> {
    set_point(playlist, index, TrimPoint::Out, position_ns)
}

/// Set either boundary of `playlist[index]`, returning the previous value.
pub fn set_point(
    playlist: &mut Playlist,
    index: usize,
    point: TrimPoint,
    position_ns: u64,
) -> Result<u64> {
    let entry = playlist.get_mut(index)?;
    let field = match point {
        TrimPoint::In => &mut entry.in_point,
        TrimPoint::Out => &mut entry.out_point,
    };
    let old = std::mem::replace(field, position_ns);
    debug!(index, ?point, old, new = position_ns, "Set trim point");
    Ok(old)
}

// ── Edit commands ───────────────────────────────────────────────

/// A reversible edit on the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Move one boundary of one entry from `old` to `new`.
    SetPoint {
        index: usize,
        point: TrimPoint,
        old: u64,
        new: u64,
    },
    /// A batch of commands applied in order.
    Batch(Vec<EditCommand>),
}

impl EditCommand {
    /// Perform a single point edit on `playlist` and record it.
    pub fn execute(
        playlist: &mut Playlist,
        index: usize,
        point: TrimPoint,
        position_ns: u64,
    ) -> Result<Self> {
        let old = set_point(playlist, index, point, position_ns)?;
        Ok(Self::SetPoint {
            index,
            point,
            old,
            new: position_ns,
        })
    }

    /// Apply this command to a playlist.
    ///
    /// Every index is checked before anything is written, so a failing batch
    /// leaves the playlist untouched.
    pub fn apply(&self, playlist: &mut Playlist) -> Result<()> {
        self.check_indices(playlist.len())?;
        self.apply_unchecked(playlist);
        Ok(())
    }

    fn apply_unchecked(&self, playlist: &mut Playlist) {
        match self {
            Self::SetPoint {
                index, point, new, ..
            } => {
                if let Ok(entry) = playlist.get_mut(*index) {
                    match point {
                        TrimPoint::In => entry.in_point = *new,
                        TrimPoint::Out => entry.out_point = *new,
                    }
                }
            }
            Self::Batch(commands) => {
                for command in commands {
                    command.apply_unchecked(playlist);
                }
            }
        }
    }

    fn check_indices(&self, len: usize) -> Result<()> {
        match self {
            Self::SetPoint { index, .. } if *index >= len => {
                Err(CutlistError::Index { index: *index, len })
            }
            Self::SetPoint { .. } => Ok(()),
            Self::Batch(commands) => commands.iter().try_for_each(|c| c.check_indices(len)),
        }
    }

    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::SetPoint {
                index,
                point,
                old,
                new,
            } => Self::SetPoint {
                index: *index,
                point: *point,
                old: *new,
                new: *old,
            },
            Self::Batch(commands) => {
                Self::Batch(commands.iter().rev().map(|c| c.inverse()).collect())
            }
        }
    }
}

// ── Undo stack ──────────────────────────────────────────────────

/// Bounded undo/redo history.
///
/// Taking a command out of the history is two steps: `next_undo`/`next_redo`
/// look at the command to apply, and `commit_undo`/`commit_redo` move it
/// across once the caller has applied and persisted it. A failed apply leaves
/// the history as it was.
#[derive(Debug)]
pub struct UndoStack {
    done: VecDeque<EditCommand>,
    undone: Vec<EditCommand>,
    limit: usize,
}

impl UndoStack {
    /// History keeping at most `limit` undoable edits.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            limit,
        }
    }

    /// Record a freshly executed edit. Discards anything that could be redone.
    pub fn record(&mut self, command: EditCommand) {
        self.undone.clear();
        self.push_done(command);
    }

    /// The command that undoes the most recent edit.
    pub fn next_undo(&self) -> Option<EditCommand> {
        self.done.back().map(EditCommand::inverse)
    }

    /// The most recently undone edit.
    pub fn next_redo(&self) -> Option<&EditCommand> {
        self.undone.last()
    }

    /// Mark the command from `next_undo` as applied.
    pub fn commit_undo(&mut self) {
        if let Some(command) = self.done.pop_back() {
            self.undone.push(command);
        }
    }

    /// Mark the command from `next_redo` as applied.
    pub fn commit_redo(&mut self) {
        if let Some(command) = self.undone.pop() {
            self.push_done(command);
        }
    }

    pub fn undo_len(&self) -> usize {
        self.done.len()
    }

    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }

    fn push_done(&mut self, command: EditCommand) {
        self.done.push_back(command);
        if self.done.len() > self.limit {
            self.done.pop_front();
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::with_limit(200)
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipEntry;

    fn playlist() -> Playlist {
        Playlist::from_entries(vec![
            ClipEntry::new(0, 10, "a.mov").unwrap(),
            ClipEntry::new(5, 50, "b.mov").unwrap(),
            ClipEntry::new(7, 70, "c.mov").unwrap(),
        ])
    }

    #[test]
    fn test_set_in_point_touches_only_target() {
        let mut p = playlist();
        let before = p.clone();

        let old = set_in_point(&mut p, 1, 42).unwrap();
        assert_eq!(old, 5);
        assert_eq!(p.get(1).unwrap().in_point, 42);
        assert_eq!(p.get(1).unwrap().out_point, 50);
        assert_eq!(p.get(0).unwrap(), before.get(0).unwrap());
        assert_eq!(p.get(2).unwrap(), before.get(2).unwrap());
    }

    #[test]
    fn test_set_out_point_does_not_validate_order() {
        let mut p = playlist();
        set_out_point(&mut p, 0, 0).unwrap();
        let entry = p.get(0).unwrap();
        assert_eq!((entry.in_point, entry.out_point), (0, 0));
    }

    #[test]
    fn test_set_point_out_of_range() {
        let mut p = playlist();
        let err = set_in_point(&mut p, 3, 1).unwrap_err();
        assert!(matches!(err, CutlistError::Index { index: 3, len: 3 }));
        assert_eq!(p, playlist());
    }

    #[test]
    fn test_execute_then_inverse_restores() {
        let mut p = playlist();
        let cmd = EditCommand::execute(&mut p, 2, TrimPoint::Out, 99).unwrap();
        assert_eq!(p.get(2).unwrap().out_point, 99);

        cmd.inverse().apply(&mut p).unwrap();
        assert_eq!(p, playlist());
    }

    #[test]
    fn test_batch_inverse_reverses_order() {
        let batch = EditCommand::Batch(vec![
            EditCommand::SetPoint {
                index: 0,
                point: TrimPoint::In,
                old: 0,
                new: 1,
            },
            EditCommand::SetPoint {
                index: 0,
                point: TrimPoint::In,
                old: 1,
                new: 2,
            },
        ]);

        let mut p = playlist();
        batch.apply(&mut p).unwrap();
        assert_eq!(p.get(0).unwrap().in_point, 2);

        batch.inverse().apply(&mut p).unwrap();
        assert_eq!(p.get(0).unwrap().in_point, 0);
    }

    #[test]
    fn test_failing_batch_leaves_playlist_untouched() {
        let batch = EditCommand::Batch(vec![
            EditCommand::SetPoint {
                index: 0,
                point: TrimPoint::In,
                old: 0,
                new: 9,
            },
            EditCommand::SetPoint {
                index: 10,
                point: TrimPoint::Out,
                old: 0,
                new: 9,
            },
        ]);
        let mut p = playlist();
        assert!(batch.apply(&mut p).is_err());
        assert_eq!(p, playlist());
    }

    #[test]
    fn test_undo_then_redo() {
        let mut p = playlist();
        let mut history = UndoStack::default();
        history.record(EditCommand::execute(&mut p, 0, TrimPoint::In, 3).unwrap());
        assert!(history.next_redo().is_none());

        history.next_undo().unwrap().apply(&mut p).unwrap();
        history.commit_undo();
        assert_eq!(p.get(0).unwrap().in_point, 0);
        assert_eq!((history.undo_len(), history.redo_len()), (0, 1));

        history.next_redo().unwrap().apply(&mut p).unwrap();
        history.commit_redo();
        assert_eq!(p.get(0).unwrap().in_point, 3);
        assert_eq!((history.undo_len(), history.redo_len()), (1, 0));
    }

    #[test]
    fn test_uncommitted_undo_keeps_history() {
        let mut p = playlist();
        let mut history = UndoStack::default();
        history.record(EditCommand::execute(&mut p, 2, TrimPoint::Out, 1).unwrap());

        let mut shrunk = Playlist::from_entries(vec![ClipEntry::new(0, 1, "a.mov").unwrap()]);
        assert!(history.next_undo().unwrap().apply(&mut shrunk).is_err());
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.next_undo(), history.next_undo());
    }

    #[test]
    fn test_record_discards_redo() {
        let mut p = playlist();
        let mut history = UndoStack::default();
        history.record(EditCommand::execute(&mut p, 0, TrimPoint::In, 3).unwrap());
        history.commit_undo();
        assert_eq!(history.redo_len(), 1);

        history.record(EditCommand::execute(&mut p, 1, TrimPoint::Out, 4).unwrap());
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_redo_keeps_remaining_redo_entries() {
        let mut p = playlist();
        let mut history = UndoStack::default();
        history.record(EditCommand::execute(&mut p, 0, TrimPoint::In, 1).unwrap());
        history.record(EditCommand::execute(&mut p, 0, TrimPoint::In, 2).unwrap());
        history.commit_undo();
        history.commit_undo();

        history.commit_redo();
        assert_eq!((history.undo_len(), history.redo_len()), (1, 1));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut p = playlist();
        let mut history = UndoStack::with_limit(2);
        for pos in 1..=5 {
            history.record(EditCommand::execute(&mut p, 0, TrimPoint::In, pos).unwrap());
        }
        assert_eq!(history.undo_len(), 2);
        assert_eq!(
            history.next_undo(),
            Some(EditCommand::SetPoint {
                index: 0,
                point: TrimPoint::In,
                old: 5,
                new: 4,
            })
        );
    }
}
