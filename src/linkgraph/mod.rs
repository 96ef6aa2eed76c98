/*! Link-graph construction (spec.md §4.3): merges the webgraph and
keyword link sets into one deduplicated, pulse-score-normalized, sharded
edge set consumed by pulse-rank (§4.4) and the cluster-merge stage (§4.5).
!*/
pub mod merge;
pub mod record;
pub mod stage;

pub use merge::{merge_duplicate_edges, shard_for_source, LinkKind};
pub use record::{BinLink, RawLink};
pub use stage::run_stage;
