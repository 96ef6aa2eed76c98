/*! Tokenization / lexicon writeback (spec.md §4 item 2): the stop-word
and stem-word dictionaries, and the `dictionary_offset` table that turns
per-shard local ids into the single global id space every later stage
assumes.
!*/
pub mod dictionary_offset;
pub mod stage;
pub mod stopwords;

pub use dictionary_offset::{DictionaryOffset, DictionaryOffsetHeader, DivisionOffset};
pub use stage::{run_stage, DivisionCounts};
pub use stopwords::{StemTable, StopWordTable};
