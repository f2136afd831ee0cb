//! ffmpeg command lines for render operations.
//!
//! Trims use input seeking with stream copy, so cuts snap to keyframes and
//! nothing is re-encoded. The concat step uses the concat demuxer over the
//! plan's manifest.

use cutlist_core::format_seconds;
use std::path::Path;

use crate::plan::{quote, ConcatOp, RenderOp, RenderPlan, TrimOp};

/// Arguments for one trim: `-y -ss <start> -i <in> -c copy -t <dur> <out>`.
pub fn trim_args(op: &TrimOp) -> Vec<String> {
    vec![
        "-y".into(),
        "-ss".into(),
        format_seconds(op.start_ns),
        "-i".into(),
        op.input.to_string_lossy().into_owned(),
        "-c".into(),
        "copy".into(),
        "-t".into(),
        format_seconds(op.duration_ns),
        op.output.to_string_lossy().into_owned(),
    ]
}

/// Arguments for the concat: `-y -safe 0 -f concat -i <manifest> -codec copy <out>`.
pub fn concat_args(op: &ConcatOp) -> Vec<String> {
    vec![
        "-y".into(),
        "-safe".into(),
        "0".into(),
        "-f".into(),
        "concat".into(),
        "-i".into(),
        op.manifest_path.to_string_lossy().into_owned(),
        "-codec".into(),
        "copy".into(),
        op.output_path.to_string_lossy().into_owned(),
    ]
}

/// Arguments for any plan operation.
pub fn op_args(op: RenderOp<'_>) -> Vec<String> {
    match op {
        RenderOp::Trim(trim) => trim_args(trim),
        RenderOp::Concat(concat) => concat_args(concat),
    }
}

/// A POSIX shell script running every operation of the plan in order.
///
/// `set -e` stops the script at the first failing command.
pub fn render_script(plan: &RenderPlan, ffmpeg_binary: &Path) -> String {
    let program = quote(&ffmpeg_binary.to_string_lossy());
    let mut out = String::from("#!/bin/sh\nset -e\n");
    for op in plan.operations() {
        let words: Vec<String> = op_args(op).iter().map(|a| shell_word(a)).collect();
        out.push_str(&program);
        out.push(' ');
        out.push_str(&words.join(" "));
        out.push('\n');
    }
    out
}

/// Quote only when the shell would otherwise split or expand the word.
fn shell_word(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_.,/:=+".contains(&b));
    if plain {
        arg.to_string()
    } else {
        quote(arg)
    }
}
