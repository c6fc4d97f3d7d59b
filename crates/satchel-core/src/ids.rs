//! ID allocation over a used-ID set.
//!
//! Tools hand out the lowest free value for user-facing IDs (so handles
//! stay short after deletions) and the highest free value for permanent
//! IDs (so they are never reused while any item is alive).

use std::collections::HashSet;

/// Smallest value not in `used`, starting from 0.
pub fn lowest_free(used: &HashSet<u32>) -> u32 {
    let mut id = 0;
    while used.contains(&id) {
        id += 1;
    }
    id
}

/// One past the largest value in `used`; 0 for an empty set.
pub fn highest_free(used: &HashSet<u32>) -> u32 {
    used.iter().max().map_or(0, |max| max + 1)
}
