use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, anyhow};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::{
    config::Config,
    index::CaseIndex,
    scanner::{IncludeKind, IncludeScanner},
};

/// Enumerate the immediate children of `root`. These are the search roots
/// that angle-bracket includes resolve against, printed one per line so the
/// user can see what counts as a library root.
fn library_roots(root: &Path) -> Result<Vec<PathBuf>> {
    let mut roots = vec![];
    for entry in
        fs::read_dir(root).with_context(|| anyhow!("Failed to read {}", root.display()))?
    {
        let entry = entry.with_context(|| anyhow!("Failed to read {}", root.display()))?;
        println!("{}", entry.path().display());
        let canonical = entry
            .path()
            .canonicalize()
            .with_context(|| anyhow!("Failed to canonicalize {}", entry.path().display()))?;
        roots.push(canonical);
    }
    Ok(roots)
}

/// Walk the whole tree below `root`: give every entry a lowercase alias
/// where its own name is case-mismatched elsewhere, and resolve the include
/// directives of every recognized source file.
pub fn run(root: &Path, config: &Config) -> Result<()> {
    let canonical_root = root
        .canonicalize()
        .with_context(|| anyhow!("Failed to canonicalize {}", root.display()))?;
    let roots = library_roots(root)?;
    let index = CaseIndex::build(root)?;

    // Sorted so that runs are reproducible and a directory's lowercase
    // alias exists before later siblings resolve paths through it.
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.context("Failed to enumerate directory tree")?;
        let path = entry
            .path()
            .canonicalize()
            .with_context(|| anyhow!("Failed to canonicalize {}", entry.path().display()))?;

        // Directory names referred to in lowercase elsewhere in the tree
        // (`Src` vs `src`) are fixed by aliasing every entry's own path.
        // Only the part below the root is lowered, so the tree is repaired
        // the same way wherever it sits. An entry that canonicalizes to
        // somewhere outside the root is not a real name in the tree.
        if let Ok(relative) = path.strip_prefix(&canonical_root) {
            materialize(&index, &canonical_root.join(lowercase_spelling(relative)));
        }

        if path.is_dir() || !config.is_source_file(&path) {
            continue;
        }
        scan_file(&index, &roots, &path)?;
    }
    Ok(())
}

/// Scan one source file and materialize a link for every include candidate:
/// quoted names resolve next to the file, angle names against each library
/// root in turn.
fn scan_file(index: &CaseIndex, roots: &[PathBuf], path: &Path) -> Result<()> {
    let contents =
        fs::read(path).with_context(|| anyhow!("Failed to read {}", path.display()))?;
    let parent = path
        .parent()
        .with_context(|| anyhow!("No parent directory for {}", path.display()))?;

    let mut scanner = IncludeScanner::new(&contents);
    while !scanner.at_end() {
        let Some(include) = scanner.next_directive() else {
            continue;
        };
        let name = String::from_utf8_lossy(include.name);
        debug!("{}: {} include \"{}\"", path.display(), include.kind, name);
        let name = Path::new(name.as_ref());
        match include.kind {
            IncludeKind::Quoted => materialize(index, &parent.join(name)),
            IncludeKind::Angle => {
                for root in roots {
                    materialize(index, &root.join(name));
                }
            }
        }
    }
    Ok(())
}

/// One failed mapping is logged and skipped; it never stops the walk.
fn materialize(index: &CaseIndex, referred_to_as: &Path) {
    if let Err(err) = index.materialize_if_needed(referred_to_as) {
        warn!("Ignoring error for {}: {}", referred_to_as.display(), err);
    }
}

fn lowercase_spelling(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_ascii_lowercase())
}
