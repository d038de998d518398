//! Lookup structures used by the stores.

mod prefix_map;

pub use prefix_map::*;
