use std::sync::OnceLock;

/// A cell has at most 8 neighbors, so counts range over `0..=8`
const NEIGHBOR_COUNTS: usize = 9;
type LifeTable = [[bool; NEIGHBOR_COUNTS]; 2];

/// Returns a Singleton lookup table for the B3/S23 ruleset
///
/// Equivalent to calling [`generate_life_table`] once and storing the result
fn life_table() -> &'static LifeTable {
    static TABLE: OnceLock<LifeTable> = OnceLock::new();
    TABLE.get_or_init(generate_life_table)
}

/// Creates a lookup table for the Game of Life ruleset
///
/// The table is indexed by `[alive as usize][neighbors]` and holds whether
/// the cell is alive in the next generation.
fn generate_life_table() -> LifeTable {
    let mut table = [[false; NEIGHBOR_COUNTS]; 2];
    for (state, row) in table.iter_mut().enumerate() {
        for (neighbors, next) in row.iter_mut().enumerate() {
            *next = matches!((state == 1, neighbors), (true, 2) | (_, 3));
        }
    }
    table
}

/// Whether a cell is alive next generation, given its state and live neighbor count
#[inline]
pub(super) fn next_state(alive: bool, neighbors: usize) -> bool {
    debug_assert!(neighbors < NEIGHBOR_COUNTS, "more than 8 neighbors");
    life_table()[usize::from(alive)][neighbors]
}
