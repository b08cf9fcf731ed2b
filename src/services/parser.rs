// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Heuristic parser turning free-text model output into a [`CommitMessage`].
//!
//! Parsing never fails: output that doesn't look like a conventional commit
//! degrades to a `chore` classification with a truncated description.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{CommitMessage, CommitType};

/// First line of a conventional commit: `type(scope): description`,
/// scope optional.
static FIRST_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)(?:\(([^)]+)\))?: (.+)$").unwrap());

const FALLBACK_DESCRIPTION_LEN: usize = 50;

pub fn parse_commit_text(text: &str) -> CommitMessage {
    let text = text.trim();
    let lines: Vec<&str> = text.lines().collect();
    let first_line = lines.first().map(|l| l.trim()).unwrap_or("");

    let Some(caps) = FIRST_LINE.captures(first_line) else {
        return fallback(first_line);
    };

    let Some(commit_type) = CommitType::parse(&caps[1]) else {
        // Shape matched but the type word is not in the vocabulary
        return fallback(first_line);
    };

    let scope = caps.get(2).map(|m| m.as_str().to_string());
    let description = caps[3].to_string();

    // Body is everything after the first blank line
    let body = if lines.len() > 2 && lines[1].trim().is_empty() {
        let body = lines[2..].join("\n").trim().to_string();
        (!body.is_empty()).then_some(body)
    } else {
        None
    };

    CommitMessage {
        commit_type,
        scope,
        description,
        body,
        breaking_changes: Vec::new(),
    }
}

fn fallback(first_line: &str) -> CommitMessage {
    CommitMessage {
        commit_type: CommitType::Chore,
        scope: None,
        description: first_line.chars().take(FALLBACK_DESCRIPTION_LEN).collect(),
        body: None,
        breaking_changes: Vec::new(),
    }
}
