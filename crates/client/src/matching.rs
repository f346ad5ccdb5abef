//! Name-match selection shared by every search caller.
//!
//! Render file names carry task, artist and version suffixes, so a plain
//! substring search is prone to picking an unrelated asset that merely
//! shares a prefix. Selection therefore prefers, in order:
//!
//! 1. exact (case-sensitive) name equality,
//! 2. case-insensitive exact equality,
//! 3. the first result containing the query as a substring (case-insensitive).
//!
//! Within a tier, the service's result order decides; that order is not
//! guaranteed stable across service versions.

use crate::types::{Asset, AssetKind};

/// Picks the best match for `query` out of `results`, optionally restricted
/// to one asset kind. Names are trimmed before comparison.
pub fn best_name_match<'a>(
    results: &'a [Asset],
    query: &str,
    kind: Option<AssetKind>,
) -> Option<&'a Asset> {
    let query = query.trim();
    let query_lower = query.to_lowercase();

    let mut ci_match = None;
    let mut partial_match = None;

    for asset in results {
        if kind.is_some_and(|k| asset.kind != k) {
            continue;
        }
        let name = asset.name.trim();
        if name == query {
            return Some(asset);
        }
        let name_lower = name.to_lowercase();
        if ci_match.is_none() && name_lower == query_lower {
            ci_match = Some(asset);
        }
        if partial_match.is_none() && name_lower.contains(&query_lower) {
            partial_match = Some(asset);
        }
    }

    ci_match.or(partial_match)
}
