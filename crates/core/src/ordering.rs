//! Dense per-group sort order assignment.
//!
//! Records that carry a `sort_order` never get one implicitly. Callers either
//! pass an explicit position or ask the store for the next free one in the
//! group, which is computed here.

/// Next position after the largest existing one, or `0` for an empty group.
///
/// Gaps left by explicit positions or deletions are not filled.
pub fn next_sort_order<I>(siblings: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    siblings
        .into_iter()
        .max()
        .map_or(0, |max| max.saturating_add(1))
}
