//! The square board of words and who owns each one.

use crate::error::{Error, Result};
use crate::vocabulary::{Vocabulary, normalize_word};
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;
use std::collections::HashSet;
use std::fmt;

pub const PLACEHOLDER: &str = "---";

const CELL_WIDTH: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Lethal,
    TeamA,
    TeamB,
    Neutral,
}

impl Owner {
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Lethal => '#',
            Self::TeamA => '<',
            Self::TeamB => '>',
            Self::Neutral => '-',
        }
    }

    #[must_use]
    pub fn team(self) -> Option<Team> {
        match self {
            Self::TeamA => Some(Team::A),
            Self::TeamB => Some(Team::B),
            Self::Lethal | Self::Neutral => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    A,
    B,
}

impl Team {
    #[must_use]
    pub fn owner(self) -> Owner {
        match self {
            Self::A => Owner::TeamA,
            Self::B => Owner::TeamB,
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        self.owner().glyph().to_string().repeat(3)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "Team A"),
            Self::B => write!(f, "Team B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCell {
    pub word: String,
    pub owner: Owner,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerCounts {
    pub lethal: usize,
    pub team_a: usize,
    pub team_b: usize,
    pub neutral: usize,
}

impl OwnerCounts {
    /// One lethal word; the second team gets a third of the board and the
    /// first team one more. A 5x5 board splits 1/9/8/7.
    #[must_use]
    pub fn for_size(size: usize) -> Self {
        let total = size * size;
        let team_b = total / 3;
        let team_a = team_b + 1;
        Self {
            lethal: 1,
            team_a,
            team_b,
            neutral: total.saturating_sub(1 + team_a + team_b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRole {
    Spymaster,
    TeamPlayer,
}

/// Display token for one cell: an owner tag followed by the padded word.
///
/// Guessed cells show their owner to everybody. Spymasters also see the
/// owner of every unguessed cell; team players only see the word.
#[must_use]
pub fn render_cell(cell: &BoardCell, role: ViewerRole) -> String {
    let glyph = cell.owner.glyph();
    if !cell.visible {
        let mask = glyph.to_string().repeat(CELL_WIDTH);
        return format!("{glyph}{mask}");
    }
    match role {
        ViewerRole::Spymaster => {
            let word = match cell.owner {
                Owner::Neutral => cell.word.clone(),
                Owner::Lethal | Owner::TeamA | Owner::TeamB => cell.word.to_uppercase(),
            };
            format!("{glyph}{word:<CELL_WIDTH$}")
        }
        ViewerRole::TeamPlayer => format!(" {:<CELL_WIDTH$}", cell.word.to_uppercase()),
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<BoardCell>,
}

impl Board {
    pub fn random<R: Rng + ?Sized>(
        vocabulary: &Vocabulary,
        size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let total = size * size;
        if vocabulary.len() < total {
            return Err(Error::InvalidSetup(format!(
                "Vocabulary has {} words, a {size}x{size} board needs {total}",
                vocabulary.len()
            )));
        }
        let picks = sample(rng, vocabulary.len(), total);
        let mut positions: Vec<usize> = (0..total).collect();
        positions.shuffle(rng);

        let counts = OwnerCounts::for_size(size);
        let mut owners = vec![Owner::Neutral; total];
        let mut assigned = positions.iter();
        for (owner, count) in [
            (Owner::Lethal, counts.lethal),
            (Owner::TeamA, counts.team_a),
            (Owner::TeamB, counts.team_b),
        ] {
            for &pos in assigned.by_ref().take(count) {
                owners[pos] = owner;
            }
        }

        let cells = picks
            .iter()
            .zip(owners)
            .map(|(i, owner)| BoardCell {
                word: vocabulary.words()[i].clone(),
                owner,
                visible: true,
            })
            .collect();
        Ok(Self { size, cells })
    }

    /// Build a board from `"LETHAL;TEAMA,..;TEAMB,..;NEUTRAL,.."`.
    ///
    /// Missing cells are filled with hidden neutral placeholders and the
    /// whole board is shuffled.
    pub fn from_setup<R: Rng + ?Sized>(
        setup: &str,
        vocabulary: &Vocabulary,
        size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let groups: Vec<&str> = setup.split(';').collect();
        if groups.len() != 4 {
            return Err(Error::InvalidSetup(format!(
                "Expected 4 groups separated by ';', got {}",
                groups.len()
            )));
        }

        let total = size * size;
        let counts = OwnerCounts::for_size(size);
        let limits = [
            (Owner::Lethal, counts.lethal),
            (Owner::TeamA, counts.team_a),
            (Owner::TeamB, counts.team_b),
            (Owner::Neutral, counts.neutral),
        ];

        let mut seen = HashSet::new();
        let mut cells = Vec::with_capacity(total);
        for (group, (owner, limit)) in groups.iter().zip(limits) {
            let mut in_group = 0;
            for raw in group.split(',') {
                let word = normalize_word(raw);
                if word.is_empty() {
                    continue;
                }
                if !vocabulary.contains(&word) {
                    return Err(Error::InvalidSetup(format!("Invalid word \"{word}\"")));
                }
                if !seen.insert(word.clone()) {
                    return Err(Error::InvalidSetup(format!("Duplicate word \"{word}\"")));
                }
                cells.push(BoardCell {
                    word,
                    owner,
                    visible: true,
                });
                in_group += 1;
            }
            if in_group > limit {
                return Err(Error::InvalidSetup(format!(
                    "Too many {owner:?} words: {in_group} > {limit}"
                )));
            }
            if owner == Owner::Lethal && in_group != counts.lethal {
                return Err(Error::InvalidSetup(
                    "Expected exactly one lethal word".to_string(),
                ));
            }
            if matches!(owner, Owner::TeamA | Owner::TeamB) && in_group == 0 {
                return Err(Error::InvalidSetup(format!("No words given for {owner:?}")));
            }
        }

        if cells.len() > total {
            return Err(Error::InvalidSetup(format!(
                "Too many words. Expected <= {total}"
            )));
        }
        while cells.len() < total {
            cells.push(BoardCell {
                word: PLACEHOLDER.to_string(),
                owner: Owner::Neutral,
                visible: false,
            });
        }
        cells.shuffle(rng);
        Ok(Self { size, cells })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn cells(&self) -> &[BoardCell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[BoardCell]> {
        self.cells.chunks(self.size)
    }

    #[must_use]
    pub fn visible_words(&self, owner: Owner) -> Vec<String> {
        self.cells
            .iter()
            .filter(|c| c.visible && c.owner == owner)
            .map(|c| c.word.clone())
            .collect()
    }

    #[must_use]
    pub fn uncovered_words(&self) -> Vec<String> {
        self.cells
            .iter()
            .filter(|c| !c.visible && c.word != PLACEHOLDER)
            .map(|c| c.word.clone())
            .collect()
    }

    #[must_use]
    pub fn count(&self, owner: Owner) -> usize {
        self.cells.iter().filter(|c| c.owner == owner).count()
    }

    #[must_use]
    pub fn lethal_word(&self) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.owner == Owner::Lethal)
            .map(|c| c.word.as_str())
    }

    /// True if `word` is a real (non-placeholder) word anywhere on the board.
    #[must_use]
    pub fn contains_word(&self, word: &str) -> bool {
        word != PLACEHOLDER && self.cells.iter().any(|c| c.word == word)
    }

    #[must_use]
    pub fn is_visible(&self, word: &str) -> bool {
        self.cells.iter().any(|c| c.visible && c.word == word)
    }

    pub fn reveal(&mut self, word: &str) -> Result<Owner> {
        let cell = self
            .cells
            .iter_mut()
            .find(|c| c.visible && c.word == word)
            .ok_or_else(|| {
                Error::InvalidGuess(format!("\"{word}\" is not a visible word"))
            })?;
        cell.visible = false;
        Ok(cell.owner)
    }
}
