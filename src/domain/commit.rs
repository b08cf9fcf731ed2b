// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Refactor,
    Docs,
    Test,
    Chore,
    Style,
    Perf,
    Build,
    Ci,
    Revert,
}

impl CommitType {
    pub const ALL: &'static [&'static str] = &[
        "feat", "fix", "refactor", "docs", "test", "chore", "style", "perf", "build", "ci",
        "revert",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Refactor => "refactor",
            Self::Docs => "docs",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Style => "style",
            Self::Perf => "perf",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Revert => "revert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "feat" => Some(Self::Feat),
            "fix" => Some(Self::Fix),
            "refactor" => Some(Self::Refactor),
            "docs" => Some(Self::Docs),
            "test" => Some(Self::Test),
            "chore" => Some(Self::Chore),
            "style" => Some(Self::Style),
            "perf" => Some(Self::Perf),
            "build" => Some(Self::Build),
            "ci" => Some(Self::Ci),
            "revert" => Some(Self::Revert),
            _ => None,
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed conventional commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub description: String,
    pub body: Option<String>,
    pub breaking_changes: Vec<String>,
}

impl CommitMessage {
    /// Canonical rendering: `type(scope): description`, optional body after
    /// a blank line, then one BREAKING CHANGE paragraph per note.
    pub fn render(&self) -> String {
        let mut out = match &self.scope {
            Some(scope) => format!("{}({}): {}", self.commit_type, scope, self.description),
            None => format!("{}: {}", self.commit_type, self.description),
        };

        if let Some(body) = &self.body {
            out.push_str("\n\n");
            out.push_str(body);
        }

        for note in &self.breaking_changes {
            out.push_str("\n\nBREAKING CHANGE: ");
            out.push_str(note);
        }

        out
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
