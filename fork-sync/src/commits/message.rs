//! Commit message parsing.

use crate::types::PrNumber;
use regex::Regex;
use std::sync::LazyLock;

/// Matches a first line ending in a `(#N)` pull request marker.
static PR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\(#(\d+)\)$").expect("PR marker pattern is valid"));

/// Title and originating PR extracted from a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// First line with trailing PR markers stripped.
    pub title: String,

    /// Number from the outermost `(#N)` marker.
    pub pr_number: Option<PrNumber>,
}

/// Extracts the title and PR number from a commit message.
///
/// Squash merges append `(#N)` to the first line. Stacked markers such as
/// `Fix (#12) (#34)` are all stripped and the last one wins.
///
/// Returns `None` when the first line is blank and carries no marker.
#[must_use]
pub fn parse_commit_message(message: &str) -> Option<ParsedMessage> {
    let first_line = message.lines().next().unwrap_or_default();

    let mut title = first_line.trim();
    let mut pr_number = None;
    while let Some(caps) = PR_MARKER.captures(title) {
        let Ok(number) = caps[2].parse::<u64>() else {
            break;
        };
        pr_number.get_or_insert(PrNumber(number));
        title = caps.get(1).map_or("", |m| m.as_str()).trim();
    }

    let title = title.trim();
    if title.is_empty() && pr_number.is_none() {
        return None;
    }

    Some(ParsedMessage {
        title: title.to_string(),
        pr_number,
    })
}
