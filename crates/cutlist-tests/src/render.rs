//! Integration tests for render planning.
//!
//! Exercises cutlist-timeline sessions feeding cutlist-media plans, script
//! generation and execution through a recording runner.

use cutlist_core::{CutlistError, ProjectConfig};
use cutlist_media::ffmpeg::render_script;
use cutlist_media::{
    build_render_plan, CommandRunner, ExecuteOptions, PlanExecutor, RenderCancel,
};
use cutlist_timeline::EditSession;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn project(text: &str) -> (TempDir, ProjectConfig) {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let config = ProjectConfig::new(tmp.path());
    std::fs::write(config.playlist_path(), text).unwrap();
    (tmp, config)
}

fn plan_for(config: &ProjectConfig) -> cutlist_core::Result<cutlist_media::RenderPlan> {
    let mut session = EditSession::from_config(config)?;
    build_render_plan(&mut session, config)
}

#[derive(Default)]
struct Recorder {
    outputs: RefCell<Vec<String>>,
}

impl CommandRunner for Recorder {
    fn run(&self, _program: &Path, args: &[String]) -> cutlist_core::Result<()> {
        let output = args.last().cloned().unwrap_or_default();
        std::fs::write(&output, b"")?;
        self.outputs.borrow_mut().push(output);
        Ok(())
    }
}

#[test]
fn single_clip_scenario() {
    let (tmp, config) = project("0 2000000000 a.mov\n");
    let plan = plan_for(&config).unwrap();

    assert_eq!(plan.trims.len(), 1);
    assert_eq!(plan.trims[0].input, tmp.path().join("a.mov"));
    assert_eq!(plan.trims[0].output, tmp.path().join("trimmed").join("a.mov"));
    assert_eq!(plan.trims[0].start_sec, 0.0);
    assert_eq!(plan.trims[0].duration_sec, 2.0);
    assert_eq!(plan.manifest.to_text().lines().count(), 1);
}

#[test]
fn empty_playlist_cannot_be_planned() {
    let (_tmp, config) = project("");
    assert!(matches!(plan_for(&config), Err(CutlistError::EmptyPlaylist)));
}

#[test]
fn reversed_marks_cannot_be_planned() {
    let (_tmp, config) = project("5000000000 1000000000 a.mov\n");
    assert!(matches!(
        plan_for(&config),
        Err(CutlistError::InvalidTrim { index: 0, .. })
    ));
}

#[test]
fn duplicated_clip_gets_distinct_outputs() {
    let (_tmp, config) = project("0 1000 a.mov\n0 1000 a.mov\n");
    let plan = plan_for(&config).unwrap();
    assert_ne!(plan.trims[0].output, plan.trims[1].output);
}

#[test]
fn plan_picks_up_latest_marks() {
    let (_tmp, config) = project("0 0 a.mov\n");
    let mut session = EditSession::from_config(&config).unwrap();
    assert!(build_render_plan(&mut session, &config).is_err());

    session.set_out_point(0, 3_000_000_000).unwrap();
    let plan = build_render_plan(&mut session, &config).unwrap();
    assert_eq!(plan.trims[0].duration_sec, 3.0);
}

#[test]
fn written_script_matches_plan() {
    let (tmp, config) = project("0 1500000000 a.mov\n500000000 2000000000 b.mov\n");
    let plan = plan_for(&config).unwrap();
    plan.write_files(&config.script_path(), Path::new("ffmpeg"))
        .unwrap();

    let script = std::fs::read_to_string(config.script_path()).unwrap();
    assert_eq!(script, render_script(&plan, Path::new("ffmpeg")));
    assert_eq!(script.lines().filter(|l| l.contains("-ss")).count(), 2);
    assert!(script.lines().last().unwrap().contains("concat"));

    let manifest = std::fs::read_to_string(config.manifest_path()).unwrap();
    let expected: Vec<String> = ["a.mov", "b.mov"]
        .iter()
        .map(|f| format!("file '{}'", tmp.path().join("trimmed").join(f).display()))
        .collect();
    assert_eq!(manifest.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn render_then_resume_skips_finished_trims() {
    let (_tmp, config) = project("0 1000 a.mov\n0 1000 a.mov\n0 1000 b.mov\n");
    let plan = plan_for(&config).unwrap();

    let first = PlanExecutor::with_runner("ffmpeg", Recorder::default());
    first.execute(&plan, |_| {}, &RenderCancel::new()).unwrap();

    let rerun = PlanExecutor::with_runner("ffmpeg", Recorder::default()).with_options(
        ExecuteOptions {
            resume_from: 0,
            skip_existing: true,
        },
    );
    let summary = rerun.execute(&plan, |_| {}, &RenderCancel::new()).unwrap();
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.ran, 1);
}

#[test]
fn every_output_is_unique_for_many_duplicates() {
    let text: String = (0..50)
        .map(|i| format!("0 10 {}\n", if i % 3 == 0 { "2_a.mov" } else { "a.mov" }))
        .collect();
    let (_tmp, config) = project(&text);
    let plan = plan_for(&config).unwrap();

    let unique: HashSet<&PathBuf> = plan.trims.iter().map(|t| &t.output).collect();
    assert_eq!(unique.len(), 50);
}
