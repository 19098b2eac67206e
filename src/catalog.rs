//! The fixed in-memory item catalog.
//!
//! This is the sole "persisted" data in the system: three records, ordered,
//! immutable for the process lifetime. Handlers only ever read slices of it.

use serde::Serialize;

/// One catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerItem {
    pub player_item: &'static str,
}

/// The catalog, in listing order.
pub const CATALOG: [PlayerItem; 3] = [
    PlayerItem {
        player_item: "sword",
    },
    PlayerItem {
        player_item: "shield",
    },
    PlayerItem {
        player_item: "armor",
    },
];

/// Return the sub-range `[skip, skip + limit)` of the catalog, clipped to its
/// bounds. Out-of-range indices yield a shorter or empty slice, never an
/// error; negative `skip` or `limit` clamp to zero.
pub fn slice(skip: i64, limit: i64) -> &'static [PlayerItem] {
    let len = CATALOG.len();
    let start = skip.clamp(0, len as i64) as usize;
    let count = limit.max(0) as usize;
    let end = start.saturating_add(count).min(len);
    &CATALOG[start..end]
}
