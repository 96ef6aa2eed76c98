//! Stop-word and stem-word dictionaries handed to the hit-list assembly
//! and association stages. Tokenization itself is an external collaborator
//! (spec.md §1 "Out of scope"); this crate only consumes the tables it
//! writes back.
use std::collections::HashMap;

/// Maps a stop word directly to its lexicon `word_id`, so a `WordHit`
/// whose `term_type` carries the `stop` bit (spec.md §3 `WordHit`) can be
/// indexed without consuming a slot from `word_log`.
#[derive(Debug, Default, Clone)]
pub struct StopWordTable {
    by_word: HashMap<String, u32>,
}

impl StopWordTable {
    pub fn new() -> Self {
        StopWordTable::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, u32)>) -> Self {
        StopWordTable {
            by_word: entries.into_iter().collect(),
        }
    }

    pub fn word_id(&self, word: &str) -> Option<u32> {
        self.by_word.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.by_word.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.by_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_word.is_empty()
    }
}

/// Maps a surface form to its stem, for the association pipeline's
/// candidate-pair scoring (spec.md §4.8) and for the "stem table the
/// lexicon exposes" mentioned by the Non-goals.
#[derive(Debug, Default, Clone)]
pub struct StemTable {
    by_word: HashMap<String, String>,
}

impl StemTable {
    pub fn new() -> Self {
        StemTable::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        StemTable {
            by_word: entries.into_iter().collect(),
        }
    }

    pub fn stem<'a>(&'a self, word: &'a str) -> &'a str {
        self.by_word.get(word).map(|s| s.as_str()).unwrap_or(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_word_table_looks_up_ids() {
        let table = StopWordTable::from_entries([("the".into(), 1), ("a".into(), 2)]);
        assert_eq!(table.word_id("the"), Some(1));
        assert_eq!(table.word_id("dog"), None);
    }

    #[test]
    fn stem_table_falls_back_to_surface_form() {
        let table = StemTable::from_entries([("running".into(), "run".into())]);
        assert_eq!(table.stem("running"), "run");
        assert_eq!(table.stem("jumping"), "jumping");
    }
}
