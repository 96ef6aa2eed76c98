/*! Segmented-file substrate: block compression, the `.comp_size` side
index, and the `Record` (de)serialization trait that stands in for the
source's `data_handler_name` string (spec.md §4.1, §6, §9 "Polymorphic
file objects").
!*/
pub mod block;
pub mod record;
pub mod segment;

pub use block::{read_block, write_block, CompSizeEntry};
pub use record::{KeyedRecord, Opaque, Record, U64Key};
pub use segment::{shard_path, SegmentReader, SegmentWriter};
