use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, anyhow};
use owo_colors::OwoColorize;
use walkdir::WalkDir;

/// Map from the lowercased spelling of a canonical absolute path to the
/// canonical path with its real on-disk case. Built in one pass over the
/// tree and read-only afterwards.
pub struct CaseIndex {
    real_names: BTreeMap<String, PathBuf>,
}

/// What `materialize_if_needed` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// No real entry folds to this spelling; nothing to do.
    NotIndexed,
    /// An entry already lives at the requested path. Never overwritten.
    AlreadyExists,
    /// A symlink was created at the requested spelling.
    Created,
}

/// Only ASCII case is folded. The tree is assumed to hold single-byte text
/// names; multi-byte case rules are out of scope.
fn fold(path: &Path) -> String {
    path.to_string_lossy().to_ascii_lowercase()
}

/// Lookup key for `candidate`: canonicalize the parent (which must already
/// exist), re-attach the file name, fold. A parent that cannot be resolved
/// means "not known" rather than an error.
fn fold_key(candidate: &Path) -> Option<String> {
    let parent = candidate.parent()?;
    let file_name = candidate.file_name()?;
    let parent = parent.canonicalize().ok()?;
    Some(fold(&parent.join(file_name)))
}

impl CaseIndex {
    /// Index every entry strictly below `root` that is not itself a symlink.
    /// Symlinks are skipped so that links created by a previous run (or
    /// pre-existing shortcuts) never count as additional real names.
    ///
    /// Two real entries that fold to the same key keep whichever the walk
    /// saw last. That collision is inherently ambiguous and is left as-is.
    pub fn build(root: &Path) -> Result<Self> {
        let mut real_names = BTreeMap::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.context("Failed to enumerate directory tree")?;
            if entry.path_is_symlink() {
                continue;
            }
            let path = entry
                .path()
                .canonicalize()
                .with_context(|| anyhow!("Failed to canonicalize {}", entry.path().display()))?;
            real_names.insert(fold(&path), path);
        }
        Ok(Self { real_names })
    }

    /// The correctly-cased entry that `candidate` refers to under any case,
    /// or `None` when no real entry folds to the same spelling.
    pub fn real_name_for(&self, candidate: &Path) -> Option<&Path> {
        let key = fold_key(candidate)?;
        self.real_names.get(&key).map(PathBuf::as_path)
    }

    /// Create a symlink at `referred_to_as` pointing at the real entry it
    /// case-insensitively refers to, unless that spelling already resolves
    /// to something. Prints one `<real> <- <created-as>` line per link
    /// created. Errors are the caller's to log; a failed mapping is
    /// expected to be skipped, not fatal.
    pub fn materialize_if_needed(&self, referred_to_as: &Path) -> io::Result<Materialized> {
        let Some(real) = self.real_name_for(referred_to_as) else {
            return Ok(Materialized::NotIndexed);
        };
        // A dangling symlink still counts as an existing entry, so probe
        // with symlink_metadata rather than exists().
        if referred_to_as.symlink_metadata().is_ok() {
            return Ok(Materialized::AlreadyExists);
        }
        create_symlink(real, referred_to_as)?;
        println!(
            "{} <- {}",
            real.display().green(),
            referred_to_as.display()
        );
        Ok(Materialized::Created)
    }
}

#[cfg(unix)]
fn create_symlink(real: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(real, link)
}

#[cfg(windows)]
fn create_symlink(real: &Path, link: &Path) -> io::Result<()> {
    if real.is_dir() {
        std::os::windows::fs::symlink_dir(real, link)
    } else {
        std::os::windows::fs::symlink_file(real, link)
    }
}
