/*! Hit-list assembly (spec.md §4.2): turns tokenized document logs into
final, globally-identified posting lists partitioned by word-id shard.
!*/
pub mod assemble;
pub mod record;
pub mod stage;

pub use assemble::{assemble_document, global_url_id, global_word_id, AssembledDocument, DocumentInput};
pub use record::{decode_hit, encode_hit, DocWordLog, ExcerptTerms, HitItem, HitType, OccurrenceEntry, WordHit};
pub use stage::run_stage;
