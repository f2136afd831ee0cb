//! Cutlist Media - Render planning and ffmpeg integration
//!
//! This crate handles:
//! - Compiling a playlist into trim and concat operations
//! - Building ffmpeg command lines and the render script
//! - Running a plan step by step, with resume and cancellation

pub mod executor;
pub mod ffmpeg;
pub mod plan;

pub use executor::{
    CommandRunner, ExecuteOptions, PlanExecutor, ProcessRunner, RenderCancel, RenderProgress,
    RenderSummary,
};
pub use plan::{build_render_plan, ConcatOp, Manifest, RenderOp, RenderPlan, RenderPlanner, TrimOp};
