//! Search-key derivation from render file names.
//!
//! Rendered deliverables are named like `<shot>_<task>_<artist>_v<nn>.<ext>`,
//! and the search key is everything before the version marker. One rule,
//! with the marker patterns as configuration: the name splits at the *last*
//! match of the first pattern that matches anywhere, and falls back to the
//! bare file stem when none do.

use regex::Regex;

/// Default marker patterns, tried in order: artist initials plus version
/// (`_jg_v03`) first, then a plain version marker (`_v03` / `_V3`).
const DEFAULT_MARKERS: [&str; 2] = [r"_[A-Za-z]{1,3}_[vV]\d+", r"_[vV]\d+"];

/// Ordered version-marker patterns tried against a file name.
#[derive(Debug, Clone)]
pub struct BaseNameRule {
    markers: Vec<Regex>,
}

impl Default for BaseNameRule {
    fn default() -> Self {
        Self::new(&DEFAULT_MARKERS).expect("default marker patterns are valid")
    }
}

impl BaseNameRule {
    /// Compiles a custom ordered pattern list.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let markers = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { markers })
    }

    /// Derives the search key for `file_name`.
    ///
    /// The first marker pattern with a match wins, splitting at its last
    /// occurrence; a name with no marker keys on its stem.
    pub fn base_name(&self, file_name: &str) -> String {
        for marker in &self.markers {
            if let Some(last) = marker.find_iter(file_name).last() {
                return file_name[..last.start()].to_string();
            }
        }

        match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => file_name.to_string(),
        }
    }
}
