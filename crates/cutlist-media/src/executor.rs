//! Plan execution.
//!
//! Runs a [`RenderPlan`] one blocking ffmpeg invocation at a time. Every trim
//! depends only on its own input and output and the concat only on the trimmed
//! files, so a failed render can be resumed at the failing step.

use cutlist_core::{CutlistError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::ffmpeg::op_args;
use crate::plan::{RenderOp, RenderPlan};

// ── Command runner ──────────────────────────────────────────────

/// Runs one external program to completion.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<()>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<()> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                CutlistError::Transcoder(format!("Failed to spawn {}: {e}", program.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            return Err(CutlistError::Transcoder(format!(
                "{} exited with status {}: {}",
                program.display(),
                output.status,
                tail.join(" | ")
            )));
        }
        Ok(())
    }
}

// ── Progress & cancellation ─────────────────────────────────────

/// Progress of a render, reported once per step.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    /// Zero-based step that just finished.
    pub step: usize,
    /// Total steps in the plan.
    pub total_steps: usize,
    /// Output written (or found) by this step.
    pub output: PathBuf,
    /// True if the step was skipped because its output already existed.
    pub skipped: bool,
}

impl RenderProgress {
    /// Completion fraction (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        (self.step + 1) as f64 / self.total_steps as f64
    }
}

/// Handle for cancelling an in-progress render.
#[derive(Debug, Clone)]
pub struct RenderCancel(Arc<AtomicBool>);

impl RenderCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for RenderCancel {
    fn default() -> Self {
        Self::new()
    }
}

// ── Executor ────────────────────────────────────────────────────

/// Options controlling which steps run.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// First step to run; earlier steps are assumed done.
    pub resume_from: usize,
    /// Skip trims whose output file already exists.
    pub skip_existing: bool,
}

/// What a finished render did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub ran: usize,
    pub skipped: usize,
}

/// Executes render plans with ffmpeg.
#[derive(Debug, Clone)]
pub struct PlanExecutor<R = ProcessRunner> {
    ffmpeg: PathBuf,
    runner: R,
    options: ExecuteOptions,
}

impl PlanExecutor<ProcessRunner> {
    /// Executor spawning `ffmpeg` as child processes.
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self::with_runner(ffmpeg, ProcessRunner)
    }
}

impl<R: CommandRunner> PlanExecutor<R> {
    /// Executor using a custom runner.
    pub fn with_runner(ffmpeg: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            runner,
            options: ExecuteOptions::default(),
        }
    }

    /// Set the execution options.
    pub fn with_options(mut self, options: ExecuteOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the plan.
    ///
    /// * `on_progress` – called after every step.
    /// * `cancel` – checked before every step; a cancelled render stops with an error.
    pub fn execute(
        &self,
        plan: &RenderPlan,
        on_progress: impl Fn(RenderProgress),
        cancel: &RenderCancel,
    ) -> Result<RenderSummary> {
        let total_steps = plan.step_count();
        if self.options.resume_from >= total_steps {
            return Err(CutlistError::InvalidParameter(format!(
                "cannot resume from step {}: plan has {} steps",
                self.options.resume_from, total_steps
            )));
        }

        for trim in &plan.trims {
            if let Some(parent) = trim.output.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }
        plan.write_manifest()?;

        info!(
            steps = total_steps,
            resume_from = self.options.resume_from,
            "Starting render"
        );

        let mut summary = RenderSummary::default();
        for (step, op) in plan.operations().enumerate().skip(self.options.resume_from) {
            if cancel.is_cancelled() {
                return Err(CutlistError::Transcoder("Render cancelled".into()));
            }

            let output = match op {
                RenderOp::Trim(trim) => trim.output.clone(),
                RenderOp::Concat(concat) => concat.output_path.clone(),
            };
            let skip = self.options.skip_existing
                && matches!(op, RenderOp::Trim(_))
                && output.exists();

            if skip {
                debug!(step, output = %output.display(), "Output exists, skipping");
                summary.skipped += 1;
            } else {
                let args = op_args(op);
                debug!(step, ?args, "Running ffmpeg");
                self.runner.run(&self.ffmpeg, &args).map_err(|e| match e {
                    CutlistError::Transcoder(msg) => CutlistError::Transcoder(format!(
                        "step {step} of {total_steps} failed (resume with step {step}): {msg}"
                    )),
                    other => other,
                })?;
                summary.ran += 1;
            }

            on_progress(RenderProgress {
                step,
                total_steps,
                output,
                skipped: skip,
            });
        }

        info!(ran = summary.ran, skipped = summary.skipped, "Render finished");
        Ok(summary)
    }
}
