//! Heuristic mapping from free-text rule names to a concrete rule id.

use crate::model::Rule;

/// Returns the id of the first rule whose lower-cased name contains any of
/// the given keywords, or `None` when nothing matches.
///
/// First-match-wins, not best-match: installations carry multiple rules for
/// the same physical category ("Harsh Braking", "Hard Brake Event") with no
/// canonical id, so whichever matching rule appears earliest is taken.
pub fn find_rule_id(rules: &[Rule], keywords: &[&str]) -> Option<String> {
    for rule in rules {
        let name = rule.name.as_deref().unwrap_or("").to_lowercase();
        if keywords.iter().any(|kw| name.contains(kw)) {
            return Some(rule.id.clone());
        }
    }
    None
}
