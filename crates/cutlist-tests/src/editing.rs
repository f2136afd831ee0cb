//! Integration tests for the editing workflow.
//!
//! Exercises cutlist-core config, cutlist-timeline persistence and sessions
//! against a real project directory.

use cutlist_core::{CutlistError, ProjectConfig};
use cutlist_timeline::{ClipEntry, EditSession, Playlist, PlaylistStore};
use proptest::prelude::*;
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────

fn project(text: &str) -> (TempDir, ProjectConfig) {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let config = ProjectConfig::new(tmp.path());
    std::fs::write(config.playlist_path(), text).unwrap();
    (tmp, config)
}

fn read_playlist(config: &ProjectConfig) -> String {
    std::fs::read_to_string(config.playlist_path()).unwrap()
}

// ── Store round trip ───────────────────────────────────────────

#[test]
fn load_then_save_reproduces_file() {
    let text = "0 0 video1.mov\n1000000000 3500000000 video2.mov\n0 0 video1.mov\n";
    let (_tmp, config) = project(text);
    let store = PlaylistStore::new(config.playlist_path());

    let playlist = store.load().unwrap();
    store.save(&playlist).unwrap();

    assert_eq!(read_playlist(&config), text);
}

#[test]
fn init_style_playlist_uses_unmarked_rows() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let config = ProjectConfig::new(tmp.path());
    let store = PlaylistStore::new(config.playlist_path());

    let playlist = Playlist::from_entries(vec![
        ClipEntry::unmarked("video1.mov").unwrap(),
        ClipEntry::unmarked("video2.mov").unwrap(),
    ]);
    store.create(&playlist).unwrap();

    assert_eq!(read_playlist(&config), "0 0 video1.mov\n0 0 video2.mov\n");
}

// ── Session workflow ───────────────────────────────────────────

#[test]
fn mark_navigate_mark_workflow() {
    let (_tmp, config) = project("0 0 a.mov\n0 0 b.mov\n");
    let mut session = EditSession::from_config(&config).unwrap();

    session.mark_in(&|| 1_000_000_000u64).unwrap();
    session.mark_out(&|| 4_000_000_000u64).unwrap();

    let next = session.next().unwrap();
    assert_eq!(next.source_path, "b.mov");
    session.mark_in(&|| 250_000_000u64).unwrap();
    session.mark_out(&|| 750_000_000u64).unwrap();

    assert_eq!(
        read_playlist(&config),
        "1000000000 4000000000 a.mov\n250000000 750000000 b.mov\n"
    );
}

#[test]
fn hand_edit_between_calls_is_not_overwritten() {
    let (_tmp, config) = project("0 0 a.mov\n0 0 b.mov\n");
    let mut session = EditSession::from_config(&config).unwrap();

    // Someone duplicates a clip in their text editor.
    std::fs::write(config.playlist_path(), "0 0 a.mov\n0 0 b.mov\n0 0 a.mov\n").unwrap();
    session.set_out_point(2, 9).unwrap();

    assert_eq!(read_playlist(&config), "0 0 a.mov\n0 0 b.mov\n0 9 a.mov\n");
}

#[test]
fn broken_hand_edit_stops_the_session() {
    let (_tmp, config) = project("0 0 a.mov\n");
    let mut session = EditSession::from_config(&config).unwrap();

    std::fs::write(config.playlist_path(), "0 zero a.mov\n").unwrap();
    assert!(matches!(
        session.next(),
        Err(CutlistError::Parse { line: 1, .. })
    ));
    assert!(session.set_in_point(0, 1).is_err());
    assert_eq!(read_playlist(&config), "0 zero a.mov\n");
}

#[test]
fn deleted_playlist_is_not_found() {
    let (_tmp, config) = project("0 0 a.mov\n");
    let mut session = EditSession::from_config(&config).unwrap();
    std::fs::remove_file(config.playlist_path()).unwrap();
    assert!(matches!(session.entry_count(), Err(CutlistError::NotFound(_))));
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn edits_touch_only_their_target(
        len in 1usize..8,
        pick in 0usize..8,
        position in any::<u64>(),
        set_in in any::<bool>(),
    ) {
        let index = pick % len;
        let text: String = (0..len).map(|i| format!("{i} {} clip{i}.mov\n", i + 100)).collect();
        let (_tmp, config) = project(&text);
        let before = Playlist::parse(&text).unwrap();

        let mut session = EditSession::from_config(&config).unwrap();
        if set_in {
            session.set_in_point(index, position).unwrap();
        } else {
            session.set_out_point(index, position).unwrap();
        }

        let after = PlaylistStore::new(config.playlist_path()).load().unwrap();
        for i in 0..len {
            let (b, a) = (before.get(i).unwrap(), after.get(i).unwrap());
            if i != index {
                prop_assert_eq!(a, b);
            } else if set_in {
                prop_assert_eq!(a.in_point, position);
                prop_assert_eq!(a.out_point, b.out_point);
                prop_assert_eq!(&a.source_path, &b.source_path);
            } else {
                prop_assert_eq!(a.out_point, position);
                prop_assert_eq!(a.in_point, b.in_point);
                prop_assert_eq!(&a.source_path, &b.source_path);
            }
        }
    }
}
