//! Render planning: compile a playlist into trim and concat operations.
//!
//! A plan is plain data. Nothing here touches the filesystem except
//! [`RenderPlan::write_files`]; running the operations is the job of
//! [`crate::executor::PlanExecutor`].

use cutlist_core::time::ns_to_seconds_f64;
use cutlist_core::{CutlistError, ProjectConfig, Result};
use cutlist_timeline::{EditSession, Playlist};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

// ── Operations ──────────────────────────────────────────────────

/// Cut one segment out of one source file with stream copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimOp {
    /// Playlist index this operation came from.
    pub index: usize,
    /// Absolute source file.
    pub input: PathBuf,
    /// Trimmed output file, unique within the plan.
    pub output: PathBuf,
    pub start_ns: u64,
    pub duration_ns: u64,
    pub start_sec: f64,
    pub duration_sec: f64,
}

/// Join every trimmed file listed in the manifest into the final output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcatOp {
    pub manifest_path: PathBuf,
    pub output_path: PathBuf,
}

/// One step of a plan, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum RenderOp<'a> {
    Trim(&'a TrimOp),
    Concat(&'a ConcatOp),
}

/// The concat demuxer's input list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub path: PathBuf,
    /// Trimmed files in playlist order.
    pub files: Vec<PathBuf>,
}

impl Manifest {
    /// `file '<path>'` per line, quotes escaped for the concat demuxer.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            out.push_str("file ");
            out.push_str(&quote(&file.to_string_lossy()));
            out.push('\n');
        }
        out
    }
}

/// Single-quote a word the way both sh and the concat demuxer accept it.
pub(crate) fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

// ── Plan ────────────────────────────────────────────────────────

/// Trim operations, the manifest and the final concat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub trims: Vec<TrimOp>,
    pub manifest: Manifest,
    pub concat: ConcatOp,
}

impl RenderPlan {
    /// All operations in execution order: every trim, then the concat.
    pub fn operations(&self) -> impl Iterator<Item = RenderOp<'_>> {
        self.trims
            .iter()
            .map(RenderOp::Trim)
            .chain(std::iter::once(RenderOp::Concat(&self.concat)))
    }

    /// Number of operations (trims + 1).
    pub fn step_count(&self) -> usize {
        self.trims.len() + 1
    }

    /// Total retained duration in nanoseconds.
    pub fn total_duration_ns(&self) -> u64 {
        self.trims.iter().map(|t| t.duration_ns).sum()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CutlistError::InvalidParameter(format!("Failed to serialize plan: {e}")))
    }

    /// Write the manifest file.
    pub fn write_manifest(&self) -> Result<()> {
        if let Some(parent) = self.manifest.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.manifest.path, self.manifest.to_text())?;
        Ok(())
    }

    /// Write the manifest and an executable shell script running the plan.
    pub fn write_files(&self, script_path: &Path, ffmpeg_binary: &Path) -> Result<()> {
        self.write_manifest()?;
        std::fs::write(script_path, crate::ffmpeg::render_script(self, ffmpeg_binary))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(script_path, std::fs::Permissions::from_mode(0o755))?;
        }

        info!(
            manifest = %self.manifest.path.display(),
            script = %script_path.display(),
            "Wrote render files"
        );
        Ok(())
    }
}

// ── Planner ─────────────────────────────────────────────────────

/// Compiles playlists into render plans.
#[derive(Debug, Clone)]
pub struct RenderPlanner {
    media_dir: PathBuf,
    trimmed_dir: PathBuf,
    manifest_path: PathBuf,
    output_path: PathBuf,
}

impl RenderPlanner {
    /// Planner with the default layout under `media_dir`.
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(&ProjectConfig::new(media_dir))
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            media_dir: config.media_dir.clone(),
            trimmed_dir: config.trimmed_dir_path(),
            manifest_path: config.manifest_path(),
            output_path: config.output_path(),
        }
    }

    /// Build the plan for `playlist`.
    ///
    /// Fails without a partial result if the playlist is empty or any entry has
    /// an out point that is not after its in point.
    ///
    /// Output names: the first entry claiming `trimmed/<path>` gets it as is;
    /// the k-th entry claiming the same name gets `trimmed/<dir>/<k>_<file>`,
    /// with k increased further if that name is already taken.
    pub fn plan(&self, playlist: &Playlist) -> Result<RenderPlan> {
        if playlist.is_empty() {
            return Err(CutlistError::EmptyPlaylist);
        }

        let mut occurrences: HashMap<PathBuf, usize> = HashMap::new();
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut trims = Vec::with_capacity(playlist.len());

        for (index, entry) in playlist.iter().enumerate() {
            let duration_ns = entry.duration().ok_or(CutlistError::InvalidTrim {
                index,
                in_point: entry.in_point,
                out_point: entry.out_point,
            })?;
            let relative = relative_source(&entry.source_path)?;

            let input = self.media_dir.join(&relative);
            let candidate = self.trimmed_dir.join(&relative);

            let seen = occurrences.entry(candidate.clone()).or_insert(0);
            *seen += 1;
            let output = if *seen == 1 && !claimed.contains(&candidate) {
                candidate
            } else {
                let mut k = (*seen).max(2);
                loop {
                    let renamed = prefixed(&candidate, k);
                    if !claimed.contains(&renamed) {
                        warn!(
                            index,
                            output = %renamed.display(),
                            "Duplicate output name, renamed"
                        );
                        break renamed;
                    }
                    k += 1;
                }
            };
            claimed.insert(output.clone());

            debug!(index, input = %input.display(), output = %output.display(), "Planned trim");
            trims.push(TrimOp {
                index,
                input,
                output,
                start_ns: entry.in_point,
                duration_ns,
                start_sec: ns_to_seconds_f64(entry.in_point),
                duration_sec: ns_to_seconds_f64(duration_ns),
            });
        }

        let manifest = Manifest {
            path: self.manifest_path.clone(),
            files: trims.iter().map(|t| t.output.clone()).collect(),
        };
        let concat = ConcatOp {
            manifest_path: self.manifest_path.clone(),
            output_path: self.output_path.clone(),
        };

        info!(trims = trims.len(), output = %concat.output_path.display(), "Built render plan");
        Ok(RenderPlan {
            trims,
            manifest,
            concat,
        })
    }
}

/// Reload the session's playlist and plan it.
pub fn build_render_plan(session: &mut EditSession, config: &ProjectConfig) -> Result<RenderPlan> {
    let playlist = session.reload()?;
    RenderPlanner::from_config(config).plan(playlist)
}

/// The source path as a normalised path inside the media directory.
///
/// `.` components are dropped so `./a.mov` and `a.mov` claim the same output.
/// The last component must name a file.
fn relative_source(source: &str) -> Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(source).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => {
                return Err(CutlistError::InvalidParameter(format!(
                    "source path '{source}' must be relative to the media directory"
                )))
            }
        }
    }
    let names_file = source
        .rsplit('/')
        .next()
        .is_some_and(|last| !matches!(last, "" | "." | ".."));
    if !names_file || relative.as_os_str().is_empty() {
        return Err(CutlistError::InvalidParameter(format!(
            "source path '{source}' does not name a file"
        )));
    }
    Ok(relative)
}

/// `dir/file` -> `dir/<k>_file`.
fn prefixed(path: &Path, k: usize) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{k}_{name}"))
}
