use std::borrow::Cow;
use std::collections::HashSet;

use crate::model::{Entity, Key};

/// Identity comparison used by relationship pickers.
///
/// Two entities match when both are saved under the same key. Two missing
/// selections match each other; a missing selection never matches an entity.
pub fn same_identity<E: Entity>(a: Option<&E>, b: Option<&E>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => matches!((a.key(), b.key()), (Some(x), Some(y)) if x == y),
        (None, None) => true,
        _ => false,
    }
}

/// Ensures every present candidate is part of `existing`, deduplicating by key.
///
/// Missing candidates are skipped. Candidates whose key is already in
/// `existing`, or repeats an earlier candidate, are dropped. Survivors are
/// placed in front of `existing`, whose own order is untouched. When nothing
/// survives the original slice is handed back borrowed, so callers can detect
/// "unchanged" without comparing contents.
pub fn merge_missing<'a, 'b, E, I>(existing: &'a [E], candidates: I) -> Cow<'a, [E]>
where
    E: Entity,
    I: IntoIterator<Item = Option<&'b E>>,
{
    let mut seen: HashSet<Key> = existing.iter().filter_map(Entity::key).collect();
    let mut merged: Vec<E> = Vec::new();

    for candidate in candidates.into_iter().flatten() {
        // An unsaved candidate has no key to collide on.
        if let Some(key) = candidate.key() {
            if !seen.insert(key) {
                continue;
            }
        }
        merged.push(candidate.clone());
    }

    if merged.is_empty() {
        return Cow::Borrowed(existing);
    }

    merged.extend_from_slice(existing);
    Cow::Owned(merged)
}
