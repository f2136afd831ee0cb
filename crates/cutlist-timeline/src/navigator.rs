//! Wraparound navigation over playlist indices.
//!
//! Stepping past either end wraps to the other end. Normalisation uses
//! Euclidean remainder so a step back from index 0 lands on `len - 1`.

use cutlist_core::{CutlistError, Result};

/// Normalise any signed index into `[0, len)`.
pub fn wrap(index: i64, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(CutlistError::EmptyPlaylist);
    }
    let len = i64::try_from(len)
        .map_err(|_| CutlistError::InvalidParameter(format!("playlist length {len} too large")))?;
    // rem_euclid is always in [0, len)
    Ok(index.rem_euclid(len) as usize)
}

/// Move `delta` entries from `current`, wrapping at both ends.
pub fn step(current: usize, delta: i64, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(CutlistError::EmptyPlaylist);
    }
    let current = (current % len) as i64;
    wrap(current + delta, len)
}

/// The entry after `current`, wrapping to 0 at the end.
pub fn next(current: usize, len: usize) -> Result<usize> {
    step(current, 1, len)
}

/// The entry before `current`, wrapping to `len - 1` at the start.
pub fn prev(current: usize, len: usize) -> Result<usize> {
    step(current, -1, len)
}
