//! Computer spymaster.
//!
//! Every non-empty subset of the team's visible words is a candidate target
//! group. Subsets are enumerated largest first, each one is handed to
//! [`ClueSearch`], and the surviving clues are ranked by
//! `score * size^gamma`. Subset evaluation runs on the rayon pool; every
//! subset carries its enumeration index so ties resolve the same way no
//! matter which worker finishes first.

use crate::config::{Config, PlannerConfig};
use crate::embedding::SimilarityIndex;
use crate::error::{Error, Result};
use crate::game_state::ClueCount;
use crate::search::{ClueSearch, SearchParams};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredClue {
    pub clue: String,
    pub targets: Vec<String>,
    pub raw_score: f32,
    /// `raw_score` scaled by the group-size bonus.
    pub score: f32,
    pub order: usize,
}

/// `0.995 WHALE + SHARK = ocean`
impl fmt::Display for ScoredClue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets: Vec<String> = self.targets.iter().map(|t| t.to_uppercase()).collect();
        write!(f, "{:.3} {} = {}", self.score, targets.join(" + "), self.clue)
    }
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub best: ScoredClue,
    pub ranked: Vec<ScoredClue>,
    pub subsets_evaluated: usize,
}

#[must_use]
pub fn effective_score(raw_score: f32, group_size: usize, gamma: f32) -> f32 {
    raw_score * (group_size as f32).powf(gamma)
}

fn by_rank(a: &ScoredClue, b: &ScoredClue) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then(a.order.cmp(&b.order))
}

pub fn rank_candidates(candidates: &mut [ScoredClue]) {
    candidates.sort_by(by_rank);
}

#[must_use]
pub fn subsets_by_size(n: usize) -> Vec<Vec<usize>> {
    let mut all = Vec::new();
    for size in (1..=n).rev() {
        let mut combo: Vec<usize> = (0..size).collect();
        loop {
            all.push(combo.clone());
            // Rightmost position that can still advance.
            let Some(pos) = (0..size).rev().find(|&i| combo[i] < n - size + i) else {
                break;
            };
            combo[pos] += 1;
            for j in pos + 1..size {
                combo[j] = combo[j - 1] + 1;
            }
        }
    }
    all
}

/// The three conditions under which an "unlimited" count beats a number:
/// the opponent is about to win, this clue alone cannot finish the board,
/// and the accumulated clues cover every remaining own word.
#[must_use]
pub fn should_say_unlimited(
    group_size: usize,
    opponent_remaining: usize,
    own_remaining: &[String],
    unfound: &BTreeSet<String>,
    threshold: usize,
) -> bool {
    let own: BTreeSet<&String> = own_remaining.iter().collect();
    let targeted: BTreeSet<&String> = unfound.iter().collect();
    opponent_remaining <= threshold && group_size + 1 < own_remaining.len() && targeted == own
}

pub struct SpymasterPlanner<'a, I: SimilarityIndex + ?Sized> {
    search: ClueSearch<'a, I>,
    settings: PlannerConfig,
}

impl<'a, I: SimilarityIndex + ?Sized> SpymasterPlanner<'a, I> {
    pub fn new(index: &'a I, config: &Config) -> Self {
        Self {
            search: ClueSearch::new(index, SearchParams::from(&config.search)),
            settings: config.planner.clone(),
        }
    }

    pub fn plan(
        &self,
        own: &[String],
        opponents: &[String],
        neutrals: &[String],
        vetoes: &[String],
    ) -> Result<Plan> {
        self.plan_avoiding(own, opponents, neutrals, vetoes, &[])
    }

    /// Same as [`Self::plan`], but the clue text must also stay clear of
    /// `uncovered` words. They take no part in scoring.
    pub fn plan_avoiding(
        &self,
        own: &[String],
        opponents: &[String],
        neutrals: &[String],
        vetoes: &[String],
        uncovered: &[String],
    ) -> Result<Plan> {
        let avoid: Vec<String> = opponents.iter().chain(neutrals).cloned().collect();
        let lexical: Vec<String> = own.iter().chain(uncovered).cloned().collect();
        let subsets = subsets_by_size(own.len());
        let gamma = self.settings.gamma;

        let mut candidates: Vec<ScoredClue> = subsets
            .par_iter()
            .enumerate()
            .filter_map(|(order, indices)| {
                let targets: Vec<String> = indices.iter().map(|&i| own[i].clone()).collect();
                let found = self.search.search(&targets, &lexical, &avoid, vetoes)?;
                Some(ScoredClue {
                    score: effective_score(found.score, targets.len(), gamma),
                    raw_score: found.score,
                    clue: found.word,
                    targets,
                    order,
                })
            })
            .collect();

        rank_candidates(&mut candidates);
        log::info!(
            "Evaluated {} target groups, {} admissible clues",
            subsets.len(),
            candidates.len()
        );

        let Some(best) = candidates.first().cloned() else {
            return Err(Error::NoClueFound);
        };
        log::info!(
            "Chose '{}' for {:?} (score {:.3})",
            best.clue,
            best.targets,
            best.score
        );
        candidates.truncate(self.settings.show_top.max(1));
        Ok(Plan {
            best,
            ranked: candidates,
            subsets_evaluated: subsets.len(),
        })
    }

    #[must_use]
    pub fn announce_count(
        &self,
        plan: &Plan,
        expert: bool,
        opponent_remaining: usize,
        own_remaining: &[String],
        unfound: &BTreeSet<String>,
    ) -> ClueCount {
        let group_size = plan.best.targets.len();
        if expert
            && should_say_unlimited(
                group_size,
                opponent_remaining,
                own_remaining,
                unfound,
                self.settings.unlimited_threshold,
            )
        {
            ClueCount::Unlimited
        } else {
            ClueCount::Count(group_size as u32)
        }
    }
}
