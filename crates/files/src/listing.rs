//! Regex-filtered, paginated listing across all shards.
//!
//! A listing runs in two passes over the shard directories:
//!
//! 1. **Count** – every shard is scanned in parallel and the number of names that fully
//!    match the pattern is reduced into `total_matching`. Order does not matter here.
//! 2. **Collect** – shards are walked one by one in ascending name order, names within a
//!    shard in ascending order, with a running match index across the whole walk. The
//!    walk stops as soon as the page is full.
//!
//! The collect pass must stay sequential; parallelising it would need a merge step to
//! restore the global order.
//!
//! A shard that cannot be read contributes zero matches to both passes.

use crate::files::FilesService;
use crate::{FilesError, FilesResult};
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A single listed file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileDescriptor {
    pub name: String,
}

/// One page of a listing plus the pagination it was computed for.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListingPage {
    pub files: Vec<FileDescriptor>,
    pub total_matching: u64,
    pub page: i64,
    pub size: i64,
}

impl FilesService {
    /// Lists stored files whose name fully matches `pattern`.
    ///
    /// `page` is zero-based and `offset = page * size`. Neither value is range-checked:
    /// a negative offset starts from the first match, and a non-positive `size` returns
    /// an empty page that still carries the correct `total_matching`.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidPattern`] if `pattern` does not compile, or
    /// [`FilesError::Io`] if the storage root itself cannot be read.
    pub fn list_matching(&self, pattern: &str, page: i64, size: i64) -> FilesResult<ListingPage> {
        tracing::info!(
            "listing files matching regex={}, page={}, size={}",
            pattern,
            page,
            size
        );

        let matcher = compile_full_match(pattern)?;
        let shards = sorted_shard_dirs(self.root_directory()).map_err(|e| {
            tracing::error!("error listing storage root: {}", e);
            FilesError::Io(e)
        })?;

        let total_matching = count_matches(&shards, &matcher);
        let files = collect_page(&shards, &matcher, page.saturating_mul(size), size);

        tracing::info!(
            "found {} files for this page, total matching items: {}",
            files.len(),
            total_matching
        );

        Ok(ListingPage {
            files,
            total_matching,
            page,
            size,
        })
    }
}

/// Compiles `pattern` so that it only matches a whole name.
fn compile_full_match(pattern: &str) -> FilesResult<Regex> {
    // Validate the pattern on its own first so a stray `)` cannot close the anchoring group.
    Regex::new(pattern)
        .and_then(|_| Regex::new(&format!("^(?:{})$", pattern)))
        .map_err(|source| {
            tracing::error!("invalid regex pattern: {}", pattern);
            FilesError::InvalidPattern {
                pattern: pattern.to_owned(),
                source,
            }
        })
}

/// Shard directories directly under `root`, sorted by directory name.
fn sorted_shard_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut shards = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            shards.push(entry.path());
        }
    }
    shards.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(shards)
}

/// Names of the regular files in `shard`, sorted.
fn shard_file_names(shard: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(shard)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn count_matches(shards: &[PathBuf], matcher: &Regex) -> u64 {
    shards
        .par_iter()
        .map(|shard| {
            tracing::debug!(
                "counting in {} on {:?}",
                shard.display(),
                std::thread::current().name()
            );
            match shard_file_names(shard) {
                Ok(names) => names.iter().filter(|n| matcher.is_match(n)).count() as u64,
                Err(e) => {
                    tracing::error!("error counting files in {}: {}", shard.display(), e);
                    0
                }
            }
        })
        .sum()
}

fn collect_page(shards: &[PathBuf], matcher: &Regex, offset: i64, size: i64) -> Vec<FileDescriptor> {
    let limit = usize::try_from(size).unwrap_or(0);
    let mut files = Vec::with_capacity(limit.min(1024));
    if limit == 0 {
        return files;
    }

    let mut matched: i64 = 0;
    for shard in shards {
        let names = match shard_file_names(shard) {
            Ok(names) => names,
            Err(e) => {
                tracing::error!("error listing files in {}: {}", shard.display(), e);
                continue;
            }
        };

        for name in names {
            if !matcher.is_match(&name) {
                continue;
            }
            matched += 1;
            if matched > offset {
                files.push(FileDescriptor { name });
                if files.len() >= limit {
                    return files;
                }
            }
        }
    }

    files
}
