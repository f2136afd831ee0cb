//! Project configuration.
//!
//! A project is a media directory holding the source clips and the playlist.
//! Settings are layered, lowest priority first:
//!
//! 1. built-in defaults
//! 2. the user config at `<config dir>/cutlist/config.json`
//! 3. the project config at `<media dir>/cutlist.json`
//! 4. explicit overrides (command-line flags)
//!
//! Missing files are skipped. A file that exists but does not parse is an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CutlistError, Result};

/// File name of the per-project config inside the media directory.
pub const PROJECT_CONFIG_FILE: &str = "cutlist.json";

/// Settings for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory containing the source clips and the playlist.
    pub media_dir: PathBuf,
    /// Playlist file name, relative to `media_dir`.
    pub playlist_file: PathBuf,
    /// Subdirectory of `media_dir` receiving the trimmed clips.
    pub trimmed_dir: PathBuf,
    /// Concat manifest written by the planner.
    pub manifest_file: PathBuf,
    /// Shell script written by the planner.
    pub script_file: PathBuf,
    /// Final concatenated output.
    pub output_file: PathBuf,
    /// Transcoder executable.
    pub ffmpeg_binary: PathBuf,
}

/// A partial config as read from a JSON file or the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub playlist_file: Option<PathBuf>,
    pub trimmed_dir: Option<PathBuf>,
    pub manifest_file: Option<PathBuf>,
    pub script_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub ffmpeg_binary: Option<PathBuf>,
}

impl ProjectConfig {
    /// Built-in defaults for a media directory.
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
            playlist_file: PathBuf::from("playlist.tsv"),
            trimmed_dir: PathBuf::from("trimmed"),
            manifest_file: PathBuf::from("merge_list.txt"),
            script_file: PathBuf::from("render.sh"),
            output_file: PathBuf::from("output.mov"),
            ffmpeg_binary: Self::find_ffmpeg(),
        }
    }

    /// Build the layered config for a media directory.
    pub fn load(media_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut config = Self::new(media_dir);

        if let Some(user) = Self::user_config_path() {
            if let Some(overrides) = read_overrides(&user)? {
                debug!(path = %user.display(), "Applying user config");
                config.apply(overrides);
            }
        }

        let project = config.media_dir.join(PROJECT_CONFIG_FILE);
        if let Some(overrides) = read_overrides(&project)? {
            debug!(path = %project.display(), "Applying project config");
            config.apply(overrides);
        }

        Ok(config)
    }

    /// Overlay every field that is set in `overrides`.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            playlist_file,
            trimmed_dir,
            manifest_file,
            script_file,
            output_file,
            ffmpeg_binary,
        } = overrides;

        if let Some(v) = playlist_file {
            self.playlist_file = v;
        }
        if let Some(v) = trimmed_dir {
            self.trimmed_dir = v;
        }
        if let Some(v) = manifest_file {
            self.manifest_file = v;
        }
        if let Some(v) = script_file {
            self.script_file = v;
        }
        if let Some(v) = output_file {
            self.output_file = v;
        }
        if let Some(v) = ffmpeg_binary {
            self.ffmpeg_binary = v;
        }
    }

    /// Location of the user-level config file, if the platform has one.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutlist").join("config.json"))
    }

    /// Search PATH for ffmpeg.
    pub fn find_ffmpeg() -> PathBuf {
        which::which("ffmpeg").unwrap_or_else(|_| PathBuf::from("ffmpeg"))
    }

    pub fn playlist_path(&self) -> PathBuf {
        self.resolve(&self.playlist_file)
    }

    pub fn trimmed_dir_path(&self) -> PathBuf {
        self.resolve(&self.trimmed_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.manifest_file)
    }

    pub fn script_path(&self) -> PathBuf {
        self.resolve(&self.script_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_file)
    }

    /// Relative paths hang off the media directory; absolute ones are kept.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.media_dir.join(path)
        }
    }
}

fn read_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| CutlistError::Config(format!("{}: {e}", path.display())))
}
