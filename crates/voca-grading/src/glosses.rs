//! Expansion of stored reference translations into candidate glosses.

use std::collections::BTreeSet;

/// Separator between acceptable meanings inside one stored translation.
pub const GLOSS_SEPARATOR: char = ',';

/// Split reference translations into a deduplicated set of glosses.
///
/// Every reference is split on [`GLOSS_SEPARATOR`] and each piece is trimmed.
/// Pieces from all references are merged and deduplicated by exact string
/// equality (after trimming, before normalization). Pieces that are empty
/// after trimming are dropped, so a whitespace-only reference contributes
/// nothing.
///
/// A `BTreeSet` keeps iteration order independent of the input order.
///
/// # Examples
/// ```
/// use voca_grading::expand_glosses;
///
/// let glosses = expand_glosses(&["빠른, 신속한", "빠른"]);
/// assert_eq!(glosses.len(), 2);
/// assert!(glosses.contains("신속한"));
/// ```
pub fn expand_glosses<S: AsRef<str>>(references: &[S]) -> BTreeSet<String> {
    references
        .iter()
        .flat_map(|reference| reference.as_ref().split(GLOSS_SEPARATOR))
        .map(str::trim)
        .filter(|gloss| !gloss.is_empty())
        .map(str::to_owned)
        .collect()
}
