//! Constrained nearest-neighbor clue selection.
//!
//! For a group of target words the search walks the vocabulary in order of
//! similarity to the group's mean direction and keeps the candidate whose
//! similarity to the *least* similar target is highest, subject to:
//! - no textual overlap with any own, opponent or veto word
//! - every opponent word strictly less similar than the weakest target
//! - every veto word at least `veto_margin` less similar than the weakest target
//!
//! Only the first `num_search` ranked candidates are scanned.

use crate::config::SearchConfig;
use crate::debug_log;
use crate::embedding::{SimilarityIndex, dot, mean_direction};
use crate::lexical::LexicalFilter;

/// Best admissible clue for one target group.
#[derive(Debug, Clone, PartialEq)]
pub struct ClueCandidate {
    pub word: String,
    /// Similarity between the clue and its least similar target.
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub num_search: usize,
    pub veto_margin: f32,
    pub degenerate_words: Vec<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchParams {
    fn from(config: &SearchConfig) -> Self {
        Self {
            num_search: config.num_search,
            veto_margin: config.veto_margin,
            degenerate_words: config.degenerate_words.clone(),
        }
    }
}

pub struct ClueSearch<'a, I: SimilarityIndex + ?Sized> {
    index: &'a I,
    filter: LexicalFilter,
    params: SearchParams,
}

impl<'a, I: SimilarityIndex + ?Sized> ClueSearch<'a, I> {
    pub fn new(index: &'a I, params: SearchParams) -> Self {
        Self {
            index,
            filter: LexicalFilter::new(),
            params,
        }
    }

    /// Find the best clue for `targets`.
    ///
    /// `own` only feeds the lexical exclusion zone; it plays no part in
    /// similarity scoring. Words missing from the index are ignored as
    /// opponents or vetoes, but a missing target yields no clue.
    pub fn search(
        &self,
        targets: &[String],
        own: &[String],
        opponents: &[String],
        vetoes: &[String],
    ) -> Option<ClueCandidate> {
        if targets.is_empty() {
            return None;
        }
        if targets.len() > 1
            && targets
                .iter()
                .any(|t| self.params.degenerate_words.contains(t))
        {
            debug_log!("Skipping group containing a degenerate word: {:?}", targets);
            return None;
        }

        let zone = self
            .filter
            .exclusion_zone(own.iter().chain(opponents).chain(vetoes));

        let target_vectors: Option<Vec<&[f32]>> =
            targets.iter().map(|t| self.index.vector(t)).collect();
        let target_vectors = target_vectors?;
        let opponent_vectors: Vec<&[f32]> = opponents
            .iter()
            .filter_map(|w| self.index.vector(w))
            .collect();
        let veto_vectors: Vec<&[f32]> = vetoes
            .iter()
            .filter_map(|w| self.index.vector(w))
            .collect();
        let mean = mean_direction(&target_vectors)?;

        let mut best: Option<ClueCandidate> = None;
        for neighbor in self.index.nearest(&mean, self.params.num_search) {
            if !self.filter.admits(neighbor.word, &zone) {
                continue;
            }
            let Some(clue_vector) = self.index.vector(neighbor.word) else {
                continue;
            };

            let min_target = target_vectors
                .iter()
                .map(|t| dot(clue_vector, t))
                .fold(f32::INFINITY, f32::min);
            if best.as_ref().is_some_and(|b| min_target <= b.score) {
                continue;
            }
            if opponent_vectors
                .iter()
                .any(|o| dot(clue_vector, o) >= min_target)
            {
                continue;
            }
            let veto_limit = min_target - self.params.veto_margin;
            if veto_vectors.iter().any(|v| dot(clue_vector, v) >= veto_limit) {
                continue;
            }

            best = Some(ClueCandidate {
                word: neighbor.word.to_string(),
                score: min_target,
            });
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingIndex;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    /// Axis 0: water, axis 1: fire, axis 2: space, axis 3: danger.
    fn themed_index() -> EmbeddingIndex {
        EmbeddingIndex::from_entries(vec![
            ("ocean".to_string(), vec![1.0, 0.0, 0.0, 0.0]),
            ("wave".to_string(), vec![0.9, 0.0, 0.1, 0.0]),
            ("fish".to_string(), vec![0.9, 0.0, 0.0, 0.2]),
            ("torch".to_string(), vec![0.0, 1.0, 0.0, 0.0]),
            ("dragon".to_string(), vec![0.0, 0.95, 0.0, 0.15]),
            ("moon".to_string(), vec![0.0, 0.0, 1.0, 0.0]),
            ("bomb".to_string(), vec![0.0, 0.3, 0.0, 1.0]),
            ("sea".to_string(), vec![0.95, 0.0, 0.05, 0.05]),
            ("marine".to_string(), vec![0.9, 0.0, 0.0, 0.3]),
            ("tide".to_string(), vec![0.85, 0.0, 0.3, 0.0]),
            ("flame".to_string(), vec![0.0, 0.95, 0.0, 0.1]),
        ])
        .unwrap()
    }

    fn index_with_overlaps() -> EmbeddingIndex {
        EmbeddingIndex::from_entries(vec![
            ("sea".to_string(), vec![0.95, 0.0, 0.05, 0.05]),
            ("ocean".to_string(), vec![1.0, 0.0, 0.0, 0.0]),
            ("seashell".to_string(), vec![1.0, 0.0, 0.0, 0.0]),
            ("sea.bed".to_string(), vec![1.0, 0.0, 0.0, 0.01]),
            ("wave".to_string(), vec![0.9, 0.0, 0.1, 0.0]),
            ("torch".to_string(), vec![0.0, 1.0, 0.0, 0.0]),
            ("bomb".to_string(), vec![0.0, 0.3, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_target_finds_close_clue() {
        let index = themed_index();
        let search = ClueSearch::new(&index, SearchParams::default());
        let own = words(&["ocean", "torch"]);
        let clue = search
            .search(&words(&["ocean"]), &own, &words(&["moon"]), &words(&["bomb"]))
            .unwrap();
        assert_eq!(clue.word, "sea");
        assert!(clue.score > 0.9);
    }

    #[test]
    fn test_clue_never_overlaps_board_words() {
        let index = index_with_overlaps();
        let search = ClueSearch::new(&index, SearchParams::default());
        let own = words(&["sea", "wave"]);
        let opponents = words(&["torch"]);
        let vetoes = words(&["bomb"]);
        let clue = search
            .search(&words(&["sea"]), &own, &opponents, &vetoes)
            .unwrap();
        let filter = LexicalFilter::new();
        for w in own.iter().chain(&opponents).chain(&vetoes) {
            assert!(!filter.too_related(&clue.word, w), "{} vs {w}", clue.word);
        }
        assert_eq!(clue.word, "ocean");
    }

    #[test]
    fn test_minimax_score_beats_every_opponent_and_veto() {
        let index = themed_index();
        let params = SearchParams::default();
        let search = ClueSearch::new(&index, params.clone());
        let targets = words(&["ocean", "fish"]);
        let opponents = words(&["wave", "moon"]);
        let vetoes = words(&["bomb"]);
        let own = words(&["ocean", "fish", "torch"]);
        let clue = search.search(&targets, &own, &opponents, &vetoes).unwrap();

        let min_target = targets
            .iter()
            .map(|t| index.similarity(&clue.word, t).unwrap())
            .fold(f32::INFINITY, f32::min);
        assert!((min_target - clue.score).abs() < 1e-6);
        for o in &opponents {
            assert!(index.similarity(&clue.word, o).unwrap() < clue.score);
        }
        for v in &vetoes {
            assert!(index.similarity(&clue.word, v).unwrap() <= clue.score - params.veto_margin);
        }
    }

    #[test]
    fn test_opponent_closer_than_target_blocks_clue() {
        let index = themed_index();
        let search = ClueSearch::new(&index, SearchParams::default());
        // "flame" is the only fire-ish candidate and dragon sits next to it
        let result = search.search(
            &words(&["torch"]),
            &words(&["torch"]),
            &words(&["dragon", "ocean", "wave", "fish", "sea", "marine", "tide", "moon"]),
            &words(&["bomb"]),
        );
        assert!(result.is_none(), "unexpected clue {result:?}");
    }

    #[test]
    fn test_veto_margin_rejects_risky_clue() {
        let index = themed_index();
        let target = words(&["fish"]);
        let own = words(&["fish"]);
        let vetoes = words(&["bomb"]);

        let lenient = ClueSearch::new(
            &index,
            SearchParams {
                veto_margin: 0.0,
                ..SearchParams::default()
            },
        );
        let strict = ClueSearch::new(
            &index,
            SearchParams {
                veto_margin: 0.95,
                ..SearchParams::default()
            },
        );
        let lenient_clue = lenient.search(&target, &own, &[], &vetoes).unwrap();
        let strict_clue = strict.search(&target, &own, &[], &vetoes).unwrap();
        assert_eq!(lenient_clue.word, "marine");
        assert_eq!(strict_clue.word, "ocean");
        let bomb = index.similarity(&strict_clue.word, "bomb").unwrap();
        assert!(bomb <= strict_clue.score - 0.95);
    }

    #[test]
    fn test_search_is_deterministic() {
        let index = themed_index();
        let search = ClueSearch::new(&index, SearchParams::default());
        let targets = words(&["ocean", "wave", "fish"]);
        let opponents = words(&["torch", "moon"]);
        let vetoes = words(&["bomb"]);
        let first = search.search(&targets, &targets, &opponents, &vetoes);
        let second = search.search(&targets, &targets, &opponents, &vetoes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_word_only_blocks_groups() {
        let index = EmbeddingIndex::from_entries(vec![
            ("march".to_string(), vec![1.0, 0.0]),
            ("april".to_string(), vec![0.9, 0.1]),
            ("month".to_string(), vec![0.95, 0.05]),
            ("army".to_string(), vec![0.1, 0.9]),
        ])
        .unwrap();
        let search = ClueSearch::new(&index, SearchParams::default());
        let own = words(&["march", "april"]);
        assert!(search.search(&own, &own, &[], &[]).is_none());
        assert!(search.search(&words(&["march"]), &own, &[], &[]).is_some());
    }

    #[test]
    fn test_scan_limit_bounds_candidates() {
        let index = themed_index();
        let search = ClueSearch::new(
            &index,
            SearchParams {
                num_search: 1,
                ..SearchParams::default()
            },
        );
        // The nearest entry to "ocean" is "ocean" itself, which is excluded.
        let own = words(&["ocean"]);
        assert!(search.search(&own, &own, &[], &[]).is_none());
    }

    #[test]
    fn test_unknown_target_gives_no_clue() {
        let index = themed_index();
        let search = ClueSearch::new(&index, SearchParams::default());
        let targets = words(&["unicorn"]);
        assert!(search.search(&targets, &targets, &[], &[]).is_none());
        assert!(search.search(&[], &[], &[], &[]).is_none());
    }
}
