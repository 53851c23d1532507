use std::collections::HashSet;

/// Curated stem equivalences the suffix rules get wrong.
const STEM_OVERRIDES: &[(&str, &str)] = &[
    ("pass", "pass"),
    ("passing", "pass"),
    ("passed", "pass"),
    ("passes", "pass"),
];

/// Noun plural rules, longest suffix first.
const PLURAL_RULES: &[(&str, &str)] = &[
    ("shes", "sh"),
    ("ches", "ch"),
    ("ies", "y"),
    ("xes", "x"),
    ("men", "man"),
    ("s", ""),
];

/// Endings that look plural but are not.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

const MIN_STEM_LEN: usize = 3;

/// Decides whether two words are too closely related to serve as clue and
/// board word at the same time.
#[derive(Debug, Clone, Default)]
pub struct LexicalFilter;

/// Words a clue must not textually overlap, with their precomputed stems.
#[derive(Debug, Clone, Default)]
pub struct ExclusionZone {
    words: Vec<String>,
    stems: HashSet<String>,
}

impl ExclusionZone {
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl LexicalFilter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Normalized stem used for equality checks.
    #[must_use]
    pub fn stem(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some((_, stem)) = STEM_OVERRIDES.iter().find(|(form, _)| *form == lower) {
            return (*stem).to_string();
        }
        if SINGULAR_ENDINGS.iter().any(|end| lower.ends_with(end)) {
            return lower;
        }
        for (suffix, replacement) in PLURAL_RULES {
            if let Some(base) = lower.strip_suffix(suffix)
                && base.len() + replacement.len() >= MIN_STEM_LEN
            {
                return format!("{base}{replacement}");
            }
        }
        lower
    }

    #[must_use]
    pub fn exclusion_zone<'a, I>(&self, words: I) -> ExclusionZone
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut zone = ExclusionZone::default();
        for word in words {
            zone.stems.insert(self.stem(word));
            zone.words.push(word.clone());
        }
        zone
    }

    /// Only plain ASCII letters can be spoken as a clue.
    #[must_use]
    pub fn has_disallowed_chars(&self, word: &str) -> bool {
        word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic())
    }

    #[must_use]
    pub fn too_related(&self, a: &str, b: &str) -> bool {
        a.contains(b) || b.contains(a) || self.stem(a) == self.stem(b)
    }

    /// True when `candidate` may be offered as a clue against `zone`.
    #[must_use]
    pub fn admits(&self, candidate: &str, zone: &ExclusionZone) -> bool {
        if self.has_disallowed_chars(candidate) {
            return false;
        }
        if zone.stems.contains(&self.stem(candidate)) {
            return false;
        }
        !zone
            .words
            .iter()
            .any(|w| w.contains(candidate) || candidate.contains(w.as_str()))
    }
}
