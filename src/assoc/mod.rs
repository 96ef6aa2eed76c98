/*! Association & excerpt-keyword pipeline (spec.md §4.8): pairwise term
association scoring, iterative grouped-term expansion, per-excerpt
keyword selection, and the approximate-match global lexicon.
!*/
pub mod cooccur;
pub mod group;
pub mod keyword;
pub mod lexicon_hash;
pub mod record;
pub mod score;
pub mod stage;

pub use cooccur::count_occurrences;
pub use group::{reduce_keyword_set, run_group_cycles, KeywordCandidate};
pub use keyword::{build_keyword_hits, select_final_keywords};
pub use lexicon_hash::{build_approx_buckets, build_reverse_lookup, consonant_skeleton, ApproxBucket};
pub use record::{AssocEntry, KeywordHit};
pub use score::{assign_assoc_ids, cutoff_by_score, lookup_assoc, score_pair};
pub use stage::run_stage;
