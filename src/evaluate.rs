//! Offline quality report for a similarity index: the strongest clues it
//! finds for single vocabulary words and for pairs of them, with no board
//! around to avoid.

use crate::embedding::SimilarityIndex;
use crate::planner::{ScoredClue, rank_candidates};
use crate::search::{ClueCandidate, ClueSearch};
use rayon::prelude::*;

fn scored(found: Option<ClueCandidate>, targets: Vec<String>, order: usize) -> Option<ScoredClue> {
    let found = found?;
    Some(ScoredClue {
        clue: found.word,
        targets,
        raw_score: found.score,
        score: found.score,
        order,
    })
}

fn keep_best(mut candidates: Vec<ScoredClue>, n: usize) -> Vec<ScoredClue> {
    rank_candidates(&mut candidates);
    candidates.truncate(n);
    candidates
}

/// The `n` best single-word clues over `words`.
pub fn top_singles<I: SimilarityIndex + ?Sized>(
    search: &ClueSearch<'_, I>,
    words: &[String],
    n: usize,
) -> Vec<ScoredClue> {
    if n == 0 {
        return Vec::new();
    }
    let candidates: Vec<ScoredClue> = words
        .par_iter()
        .enumerate()
        .filter_map(|(order, word)| {
            let targets = vec![word.clone()];
            scored(search.search(&targets, &targets, &[], &[]), targets, order)
        })
        .collect();
    log::info!("{} of {} words have a clue", candidates.len(), words.len());
    keep_best(candidates, n)
}

/// The `n` best clues for unordered pairs of `words`.
pub fn top_pairs<I: SimilarityIndex + ?Sized>(
    search: &ClueSearch<'_, I>,
    words: &[String],
    n: usize,
) -> Vec<ScoredClue> {
    if n == 0 {
        return Vec::new();
    }
    let candidates: Vec<ScoredClue> = (1..words.len())
        .into_par_iter()
        .flat_map_iter(|i1| (0..i1).map(move |i2| (i1, i2)))
        .filter_map(|(i1, i2)| {
            let targets = vec![words[i1].clone(), words[i2].clone()];
            let order = i1 * (i1 - 1) / 2 + i2;
            scored(search.search(&targets, &targets, &[], &[]), targets, order)
        })
        .collect();
    log::info!("{} word pairs have a clue", candidates.len());
    keep_best(candidates, n)
}
