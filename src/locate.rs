//! discovery of PNG files and pairing of same-relative-path images across two roots.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

const PNG_SUFFIX: &str = ".png";

/// true iff the file name ends in `.png`, ignoring case. a file named exactly `.png` counts.
pub fn is_png(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(PNG_SUFFIX))
}

/// lazily walks `root` recursively, yielding every PNG file. entries are visited in file name
/// order so the sequence is deterministic for a fixed directory state. symlinks are followed;
/// unreadable entries and link cycles are logged and skipped.
pub fn png_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_png(path))
        .inspect(|path| log::trace!("Found {:?}", path))
}

/// fails with `RootNotFound` unless `root` is an existing directory.
pub fn ensure_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(Error::RootNotFound {
            path: root.to_path_buf(),
        })
    }
}

/// an image under the A root and its counterpart under the B root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPair {
    pub a: PathBuf,
    pub b: PathBuf,
    /// path of `a` relative to the A root; `b` is this path re-rooted under the B root.
    pub relative: PathBuf,
}

/// the eagerly collected result of [`PairLocator::locate`].
#[derive(Debug, Default)]
pub struct Located {
    pub pairs: Vec<PathPair>,
    /// pairs whose counterpart under the B root does not exist.
    pub unmatched: Vec<PathPair>,
}

#[derive(Debug, Clone)]
pub struct PairLocator {
    a_root: PathBuf,
    b_root: PathBuf,
}

impl PairLocator {
    pub fn new(a_root: impl Into<PathBuf>, b_root: impl Into<PathBuf>) -> Result<Self> {
        let (a_root, b_root) = (a_root.into(), b_root.into());
        ensure_root(&a_root)?;
        ensure_root(&b_root)?;
        Ok(Self { a_root, b_root })
    }

    /// every pair derivable from the A root, without checking the B side. no file is opened.
    pub fn candidates(&self) -> impl Iterator<Item = PathPair> + '_ {
        png_files(&self.a_root).filter_map(move |a| {
            let relative = a.strip_prefix(&self.a_root).ok()?.to_path_buf();
            let b = self.b_root.join(&relative);
            Some(PathPair { a, b, relative })
        })
    }

    /// walks the A root and splits the candidates by whether their counterpart exists. each call
    /// starts a fresh walk.
    pub fn locate(&self) -> Located {
        let (pairs, unmatched): (Vec<_>, Vec<_>) =
            self.candidates().partition(|pair| pair.b.is_file());

        log::debug!(
            "Located {} pairs, {} without counterpart",
            pairs.len(),
            unmatched.len()
        );

        Located { pairs, unmatched }
    }
}
