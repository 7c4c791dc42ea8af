//! The related-item matcher.
//!
//! Inclusion only, no relevance ranking: candidates appear in the
//! collection's order and the list is cut at the limit.

use crate::record::Haircut;

/// Default number of related styles to surface.
pub const DEFAULT_RELATED_LIMIT: usize = 8;

/// Find styles related to `current` within `all`.
///
/// A candidate qualifies when it shares at least one face shape, shares at
/// least one hair type, or has the same (present) hair length. The current
/// record itself is excluded by normalized-id equality. Inputs are never
/// mutated.
pub fn find_related<'a>(current: &Haircut, all: &'a [Haircut], limit: usize) -> Vec<&'a Haircut> {
  all
    .iter()
    .filter(|candidate| candidate.id != current.id)
    .filter(|candidate| {
      shares_any(&candidate.face_shape, &current.face_shape)
        || shares_any(&candidate.hair_type, &current.hair_type)
        || (candidate.hair_length.is_some() && candidate.hair_length == current.hair_length)
    })
    .take(limit)
    .collect()
}

fn shares_any(a: &[String], b: &[String]) -> bool {
  a.iter().any(|value| b.iter().any(|other| value.eq_ignore_ascii_case(other)))
}
