// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// One changed file in the staged set. Constructed once per file per
/// generation call and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub additions: usize,
    pub deletions: usize,
    pub diff: String,
}

/// The full staged change set handed to a provider. Totals are computed
/// at construction so they always equal the per-file sums.
#[derive(Debug, Clone, Default)]
pub struct GitDiff {
    pub files: Vec<FileDiff>,
    pub total_additions: usize,
    pub total_deletions: usize,
}

impl GitDiff {
    pub fn from_files(files: Vec<FileDiff>) -> Self {
        let total_additions = files.iter().map(|f| f.additions).sum();
        let total_deletions = files.iter().map(|f| f.deletions).sum();
        Self {
            files,
            total_additions,
            total_deletions,
        }
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
