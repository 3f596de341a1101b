//! Project-specific utilities live here.

use rand::Rng;

/// Range new book ids are drawn from when the client supplies none.
pub const BOOK_ID_RANGE: std::ops::RangeInclusive<i64> = 1000..=9999;

/// Pick a pseudo-random book id.
///
/// Nothing guarantees the id is free; a clash surfaces as a conflict on insert.
pub fn random_book_id() -> i64 {
    rand::thread_rng().gen_range(BOOK_ID_RANGE)
}
