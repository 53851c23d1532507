use crate::embedding::SimilarityIndex;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_VOCABULARY: &str = include_str!("resources/words.txt");

/// Longest word a board cell can display.
pub const MAX_WORD_LEN: usize = 11;

/// Joins the parts of multi-word terms ("ice cream" -> "ice_cream").
pub const WORD_JOINER: &str = "_";

/// Characters that would break the setup string format.
const RESERVED_CHARS: [char; 2] = [',', ';'];

/// Lowercase, trim and join internal whitespace with [`WORD_JOINER`].
#[must_use]
pub fn normalize_word(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(WORD_JOINER)
}

/// The fixed set of candidate board words, in file order.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    lookup: HashSet<String>,
}

impl Vocabulary {
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Every vocabulary word must have a vector before a computer spymaster can play.
    pub fn check_against<I: SimilarityIndex + ?Sized>(&self, index: &I) -> Result<()> {
        match self.words.iter().position(|w| !index.contains(w)) {
            Some(pos) => Err(Error::Vocabulary {
                line: pos + 1,
                reason: format!("'{}' is missing from the similarity index", self.words[pos]),
            }),
            None => Ok(()),
        }
    }

    fn push_line(&mut self, line_no: usize, raw: &str) -> Result<()> {
        let word = normalize_word(raw);
        if word.is_empty() {
            return Ok(());
        }
        if word.chars().count() > MAX_WORD_LEN {
            return Err(Error::Vocabulary {
                line: line_no,
                reason: format!("'{word}' is longer than {MAX_WORD_LEN} characters"),
            });
        }
        if word.contains(RESERVED_CHARS) {
            return Err(Error::Vocabulary {
                line: line_no,
                reason: format!("'{word}' contains a reserved character"),
            });
        }
        if !self.lookup.insert(word.clone()) {
            log::warn!("Ignoring duplicate vocabulary entry '{word}' on line {line_no}");
            return Ok(());
        }
        self.words.push(word);
        Ok(())
    }

    fn empty() -> Self {
        Self {
            words: Vec::new(),
            lookup: HashSet::new(),
        }
    }
}

pub fn load_vocabulary_from_str(data: &str) -> Result<Vocabulary> {
    let mut vocabulary = Vocabulary::empty();
    for (i, line) in data.lines().enumerate() {
        vocabulary.push_line(i + 1, line)?;
    }
    Ok(vocabulary)
}

pub fn load_vocabulary_from_file<P: AsRef<Path>>(path: P) -> Result<Vocabulary> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut vocabulary = Vocabulary::empty();
    for (i, line) in reader.lines().enumerate() {
        vocabulary.push_line(i + 1, &line?)?;
    }
    log::info!("Loaded {} vocabulary words", vocabulary.len());
    Ok(vocabulary)
}
