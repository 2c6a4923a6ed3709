//! The redundancy decision

use crate::reconcile::lookup::GlobalRow;

/// Outcome of comparing one override against its global matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A global row covers this override; fallback reproduces its value
    Redundant,
    /// No global counterpart under the active comparison mode
    NotRedundant,
}

/// An override is redundant iff the lookup found any global match.
///
/// Pure; the comparison mode already shaped what counts as a match.
pub fn decide(matches: &[GlobalRow]) -> Verdict {
    if matches.is_empty() {
        Verdict::NotRedundant
    } else {
        Verdict::Redundant
    }
}
