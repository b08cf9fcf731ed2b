// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};

use crate::domain::{ChangeKind, FileDiff, GitDiff};
use crate::error::{Error, Result};

pub struct GitService {
    repo: gix::Repository,
    work_dir: PathBuf,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        let repo = gix::discover(".").map_err(|_| Error::NotAGitRepo)?;

        let work_dir = repo
            .work_dir()
            .ok_or_else(|| Error::Git("Bare repository not supported".into()))?
            .to_path_buf();

        Ok(Self { repo, work_dir })
    }

    pub fn check_state(&self) -> Result<()> {
        let state = self.repo.state();
        if matches!(state, Some(gix::state::InProgress::Merge)) {
            return Err(Error::MergeInProgress);
        }
        Ok(())
    }

    /// Collect the staged change set as the diff model providers consume.
    pub fn staged_diff(&self, max_file_lines: usize) -> Result<GitDiff> {
        self.check_state()?;

        let output = std::process::Command::new("git")
            .args(["diff", "--cached", "--name-status"])
            .current_dir(&self.work_dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.to_string()));
        }

        let mut files = Vec::new();
        let status_output = String::from_utf8_lossy(&output.stdout);

        for line in status_output.lines() {
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split('\t');
            let Some(status) = parts.next() else { continue };
            let Some(path) = parts.next() else { continue };

            // Rename lines carry old and new paths; keep the new one
            let (kind, path) = match status.chars().next() {
                Some('A') => (ChangeKind::Added, path),
                Some('M') => (ChangeKind::Modified, path),
                Some('D') => (ChangeKind::Deleted, path),
                Some('R') => (ChangeKind::Renamed, parts.next().unwrap_or(path)),
                _ => continue,
            };

            let path = Path::new(path).to_path_buf();
            if Self::is_binary_path(&path) {
                continue;
            }

            let diff = self.file_diff(&path, max_file_lines)?;
            let (additions, deletions) = Self::count_changes(&diff);

            files.push(FileDiff {
                path,
                kind,
                additions,
                deletions,
                diff,
            });
        }

        if files.is_empty() {
            return Err(Error::NoStagedChanges);
        }

        Ok(GitDiff::from_files(files))
    }

    fn file_diff(&self, path: &Path, max_lines: usize) -> Result<String> {
        // --no-ext-diff: don't use external diff tools
        // --unified=3: standard 3 lines of context
        let output = std::process::Command::new("git")
            .args(["diff", "--cached", "--no-ext-diff", "--unified=3", "--"])
            .arg(path)
            .current_dir(&self.work_dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.to_string()));
        }

        let diff = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<&str> = diff.lines().take(max_lines).collect();

        Ok(lines.join("\n"))
    }

    fn count_changes(diff: &str) -> (usize, usize) {
        let mut additions = 0;
        let mut deletions = 0;

        for line in diff.lines() {
            if line.starts_with('+') && !line.starts_with("+++") {
                additions += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                deletions += 1;
            }
        }

        (additions, deletions)
    }

    fn is_binary_path(path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        matches!(
            ext,
            "png" | "jpg"
                | "jpeg"
                | "gif"
                | "ico"
                | "webp"
                | "woff"
                | "woff2"
                | "ttf"
                | "otf"
                | "zip"
                | "tar"
                | "gz"
                | "7z"
                | "pdf"
                | "exe"
                | "dll"
                | "so"
                | "dylib"
                | "mp3"
                | "mp4"
                | "wav"
        )
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        let output = std::process::Command::new("git")
            .args(["commit", "-m", message])
            .current_dir(&self.work_dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.to_string()));
        }

        Ok(())
    }
}
