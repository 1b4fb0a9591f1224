//! The three restart-fanout strategies (§4.7 "Strategy application").
//!
//! Respun children always start with a clean slate — empty mailbox, no
//! timers, no links, new actor id — so strategy application only needs to
//! know which declaration indices to kill and respin, never anything
//! about a child's prior runtime state.

/// Which children are killed and respun together when one of them exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Respin only the failed child.
    OneForOne,
    /// Kill every other running child, then respin all children.
    OneForAll,
    /// Kill every child started after the failed one, then respin the
    /// failed child and all later children.
    RestForOne,
}

/// Declaration indices to kill-and-respin for `failed_index` exiting out
/// of `child_count` total children, in ascending (declaration) order.
pub fn restart_set(strategy: Strategy, failed_index: usize, child_count: usize) -> Vec<usize> {
    match strategy {
        Strategy::OneForOne => vec![failed_index],
        Strategy::OneForAll => (0..child_count).collect(),
        Strategy::RestForOne => (failed_index..child_count).collect(),
    }
}
