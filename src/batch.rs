//! per-item outcomes of the batch drivers.
//!
//! every item of a batch is independent: data problems (missing counterpart, undecodable file,
//! shape mismatch) skip that item only, while environment problems (an unwritable output) abort
//! the whole batch.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use rayon::prelude::*;

use crate::error::{Error, Result};

#[derive(Debug)]
pub enum Outcome {
    Written { relative: PathBuf, output: PathBuf },
    Skipped { relative: PathBuf, reason: Error },
}

impl Outcome {
    /// turns the result of processing one item into an outcome, logging it. errors that are not
    /// recoverable are returned as-is.
    pub fn settle(relative: PathBuf, result: Result<PathBuf>) -> Result<Self> {
        match result {
            Ok(output) => {
                log::info!("Wrote {:?}", output);
                Ok(Outcome::Written { relative, output })
            }
            Err(reason) if reason.is_recoverable() => {
                log::warn!("Skipped {:?}: {}", relative, reason);
                Ok(Outcome::Skipped { relative, reason })
            }
            Err(e) => Err(e),
        }
    }

    pub fn relative(&self) -> &Path {
        match self {
            Outcome::Written { relative, .. } | Outcome::Skipped { relative, .. } => relative,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Outcome::Written { .. })
    }
}

/// the outcomes of a batch, in discovery order.
#[derive(Debug, Default)]
pub struct Summary {
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.processed()
    }

    pub fn skipped_reasons(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Skipped { relative, reason } => Some((relative.as_path(), reason)),
            Outcome::Written { .. } => None,
        })
    }

    pub fn log(&self) {
        log::info!(
            "Processed {}, skipped {}",
            self.processed(),
            self.skipped()
        );
        if self.skipped() > 0 {
            log::info!(
                "Skipped items: {}",
                self.skipped_reasons()
                    .map(|(relative, _)| relative.display())
                    .join(", ")
            );
        }
    }
}

impl FromIterator<Outcome> for Summary {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// runs `work` over every item in parallel and collects the outcomes in input order. the first
/// unrecoverable error aborts the batch.
pub fn process_all<T, R, W>(items: &[T], relative: R, work: W) -> Result<Vec<Outcome>>
where
    T: Sync,
    R: Fn(&T) -> &Path + Sync,
    W: Fn(&T) -> Result<PathBuf> + Sync,
{
    items
        .par_iter()
        .map(|item| Outcome::settle(relative(item).to_path_buf(), work(item)))
        .collect()
}
