// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

//! Prompt template rendering. Providers only supply the substitution
//! variables; the template itself is fixed.

use std::fmt::Write;

use crate::domain::GitDiff;

const COMMIT_TEMPLATE: &str = "\
Generate a conventional commit message for the following staged changes.

Files changed:
{file_list}

Total: +{total_additions} -{total_deletions}

Diff:
{diff}

Respond with only the commit message. First line: type(scope): description.
Optionally follow with a blank line and a short body.";

pub struct PromptVars {
    pub file_list: String,
    pub total_additions: usize,
    pub total_deletions: usize,
    pub diff: String,
}

impl PromptVars {
    pub fn from_diff(diff: &GitDiff) -> Self {
        let mut file_list = String::new();
        let mut diff_text = String::new();

        for file in &diff.files {
            let _ = writeln!(
                file_list,
                "- {} (+{} -{})",
                file.path.display(),
                file.additions,
                file.deletions
            );
            if !file.diff.is_empty() {
                diff_text.push_str(&file.diff);
                diff_text.push('\n');
            }
        }

        Self {
            file_list: file_list.trim_end().to_string(),
            total_additions: diff.total_additions,
            total_deletions: diff.total_deletions,
            diff: diff_text.trim_end().to_string(),
        }
    }
}

pub fn render(template: &str, vars: &PromptVars) -> String {
    template
        .replace("{file_list}", &vars.file_list)
        .replace("{total_additions}", &vars.total_additions.to_string())
        .replace("{total_deletions}", &vars.total_deletions.to_string())
        .replace("{diff}", &vars.diff)
}

/// Render the standard commit prompt for a diff.
pub fn for_diff(diff: &GitDiff) -> String {
    render(COMMIT_TEMPLATE, &PromptVars::from_diff(diff))
}
