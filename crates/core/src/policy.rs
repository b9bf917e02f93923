//! Pure sorting and filtering rules for the visible projection.
//!
//! Completed items are always demoted below incomplete ones regardless of the
//! active comparator (partition-then-sort), including under
//! [`SortMethod::StoredOrder`]. A missing `order_index` sorts after every
//! assigned index so a never-reindexed draft cannot displace item 0.

use std::cmp::Ordering;

use crate::model::{Item, SortMethod};

/// Total order over items for the given sort method. Ties fall back to
/// `created_at`, then `id`, so repeated sorts are deterministic.
pub fn compare(method: SortMethod, a: &Item, b: &Item) -> Ordering {
    let primary = match method {
        SortMethod::StoredOrder => stored_order_key(a).cmp(&stored_order_key(b)),
        SortMethod::Title => a.title.cmp(&b.title),
        SortMethod::Created => b.created_at.cmp(&a.created_at),
        SortMethod::Completion => a.completed.cmp(&b.completed),
    };
    primary
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

// (false, index) for assigned indices, (true, 0) for missing ones.
fn stored_order_key(item: &Item) -> (bool, i64) {
    match item.order_index {
        Some(index) => (false, index),
        None => (true, 0),
    }
}

/// Case-insensitive substring match on the title. An empty or all-whitespace
/// query matches everything.
pub fn matches_query(item: &Item, query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return true;
    }
    item.title.to_lowercase().contains(&needle.to_lowercase())
}

/// Derive the visible projection: incomplete items first, completed items
/// after (only when `show_completed`), each partition ordered by the active
/// comparator, then narrowed by the search query. Pure function of its
/// inputs; callers recompute it on every mutation rather than caching.
pub fn visible_projection(
    items: &[Item],
    method: SortMethod,
    show_completed: bool,
    query: &str,
) -> Vec<Item> {
    let mut active: Vec<Item> = items.iter().filter(|item| !item.completed).cloned().collect();
    active.sort_by(|a, b| compare(method, a, b));

    if show_completed {
        let mut done: Vec<Item> = items.iter().filter(|item| item.completed).cloned().collect();
        done.sort_by(|a, b| compare(method, a, b));
        active.extend(done);
    }

    active.retain(|item| matches_query(item, query));
    active
}
