use serde::Serialize;

use crate::schema::Game;

/// Shape of an opened table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub game: Game,
    pub record_count: usize,
    pub record_len: usize,
    /// Entry `n` counts the records holding exactly `n` data sections.
    pub section_count_histogram: Vec<usize>,
}
