//! File relocation
//!
//! A thin wrapper over `fs::rename` with one deliberate behavior: a
//! missing source is a successful no-op, reported as
//! [`Relocation::MissingSource`] so callers can skip the node mutation
//! that would otherwise follow. The check is on the typed
//! `io::ErrorKind`, never on error text.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// What a relocation attempt actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// The file was renamed on disk.
    Renamed,
    /// The source no longer exists; nothing was done.
    MissingSource,
}

/// Rename `old_name` to `new_name`, both resolved against `dir`.
///
/// Callers pass names taken from documents inside `dir`; renames stay
/// within that directory. Errors other than a missing source
/// (permissions, cross-device, disk full) propagate and are fatal for
/// the node being processed.
pub fn relocate(dir: &Path, old_name: &str, new_name: &str) -> io::Result<Relocation> {
    let from = dir.join(old_name);
    let to = dir.join(new_name);

    match fs::rename(&from, &to) {
        Ok(()) => {
            debug!(from = %from.display(), to = %to.display(), "renamed attachment");
            Ok(Relocation::Renamed)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(from = %from.display(), "source already gone, nothing to rename");
            Ok(Relocation::MissingSource)
        }
        Err(err) => Err(err),
    }
}
