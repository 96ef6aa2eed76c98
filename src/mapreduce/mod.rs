/*! The shuffle-and-merge substrate: an external-memory MapReduce with
hash-partition, external sort (radix and quick), per-key aggregation,
hash-join, and order-preserving restitching (spec.md §4.1). Every other
stage in this crate is built from these primitives.
!*/
pub mod aggregate;
pub mod distribute;
pub mod join;
pub mod merge_set;
pub mod order;
pub mod quick_sort;
pub mod radix_sort;

pub use aggregate::{find_duplicate_key_occurrence, find_duplicate_key_weight, find_key_occurrence, find_key_weight};
pub use distribute::{distribute_keys, distribute_maps, shard_for_key};
pub use join::{apply_maps_to_keys, JoinResult};
pub use merge_set::{merge_set, merge_sorted_set};
pub use order::{order_mapped_occurrences, order_mapped_sets, tag_with_original_order, FileDivBound};
pub use quick_sort::{merge_quick_sorted_runs, quick_sort_by};
pub use radix_sort::{merge_radix_sorted_runs, radix_sort_fixed};
