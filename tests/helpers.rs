// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use commitgen::domain::{ChangeKind, FileDiff, GitDiff};

/// Create a minimal FileDiff for testing
#[allow(dead_code)]
pub fn make_file_diff(
    path: &str,
    kind: ChangeKind,
    additions: usize,
    deletions: usize,
) -> FileDiff {
    FileDiff {
        path: PathBuf::from(path),
        kind,
        additions,
        deletions,
        diff: format!("--- a/{path}\n+++ b/{path}\n@@ -1 +1 @@\n-old\n+new"),
    }
}

/// Create a GitDiff from a list of FileDiffs (totals computed)
#[allow(dead_code)]
pub fn make_git_diff(files: Vec<FileDiff>) -> GitDiff {
    GitDiff::from_files(files)
}

/// A small two-file diff used across provider tests
#[allow(dead_code)]
pub fn sample_diff() -> GitDiff {
    make_git_diff(vec![
        make_file_diff("src/auth.rs", ChangeKind::Modified, 42, 7),
        make_file_diff("tests/auth.rs", ChangeKind::Added, 30, 0),
    ])
}
