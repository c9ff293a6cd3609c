//! Parsing of pasted/imported domain lists.

use std::sync::LazyLock;

use regex::Regex;

/// Names are separated by newlines and/or commas, in any mix.
#[allow(clippy::expect_used)]
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n,]+").expect("valid separator pattern"));

/// Split free text into candidate domain names.
///
/// Entries are trimmed and lowercased; empty entries are dropped. Order is preserved and
/// duplicates are kept, deduplication is the importer's job.
#[must_use]
pub fn parse_domain_list(text: &str) -> Vec<String> {
    SEPARATOR
        .split(text)
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
