//! Cutlist Core - Foundation types for the edit-decision-list engine
//!
//! This crate provides the types shared by every other cutlist crate:
//! - The error taxonomy (CutlistError)
//! - Nanosecond time conversion, formatting and parsing
//! - Layered project configuration

pub mod config;
pub mod error;
pub mod time;

pub use config::{ConfigOverrides, ProjectConfig, PROJECT_CONFIG_FILE};
pub use error::{CutlistError, Result};
pub use time::{format_seconds, format_timecode, parse_position, NANOS_PER_SECOND};
