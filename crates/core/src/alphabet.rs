//! Letter sets used to reason about which starting letters exist.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The 33 lowercase letters of the Russian alphabet.
pub const CYRILLIC_LETTERS: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюя";

static CYRILLIC: Lazy<Alphabet> = Lazy::new(|| Alphabet::new(CYRILLIC_LETTERS));

/// Ordered set of lowercase letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from the letters in `letters`. Whitespace is ignored,
    /// letters are lowercased and repeats dropped while keeping first-seen order.
    pub fn new(letters: &str) -> Self {
        let mut collected: Vec<char> = Vec::new();
        for ch in letters.chars().filter(|ch| !ch.is_whitespace()) {
            for lower in ch.to_lowercase() {
                if !collected.contains(&lower) {
                    collected.push(lower);
                }
            }
        }
        Self { letters: collected }
    }

    /// The default Russian alphabet.
    pub fn cyrillic() -> Self {
        CYRILLIC.clone()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, letter: char) -> bool {
        letter
            .to_lowercase()
            .next()
            .map(|lower| self.letters.contains(&lower))
            .unwrap_or(false)
    }

    /// Letters in order.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().copied()
    }

    /// Number of letters.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Whether the alphabet has no letters.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::cyrillic()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letters.iter().try_for_each(|ch| write!(f, "{ch}"))
    }
}

impl Serialize for Alphabet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Alphabet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Alphabet::new(&raw))
    }
}
