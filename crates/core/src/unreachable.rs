//! Letters of the alphabet that no city in the catalog starts with.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{alphabet::Alphabet, catalog::Catalog, models::first_letter};

/// Precomputed, read-only set of dead-end starting letters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnreachableLetters {
    letters: BTreeSet<char>,
}

impl UnreachableLetters {
    /// Collect every alphabet letter that no catalog name starts with.
    pub fn compute(catalog: &Catalog, alphabet: &Alphabet) -> Self {
        let starts: BTreeSet<char> = catalog
            .records()
            .iter()
            .filter_map(|record| first_letter(&record.name))
            .collect();
        let letters: BTreeSet<char> = alphabet
            .letters()
            .filter(|letter| !starts.contains(letter))
            .collect();
        debug!(
            unreachable = %letters.iter().collect::<String>(),
            "computed unreachable letters"
        );
        Self { letters }
    }

    /// Whether no city starts with `letter`.
    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// Unreachable letters in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().copied()
    }

    /// Number of unreachable letters.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Whether every letter has at least one city.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecordPolicy;
    use crate::models::{RawCity, RawCoords};

    fn catalog(names: &[&str]) -> Catalog {
        let raws = names.iter().map(|name| RawCity {
            name: Some(name.to_string()),
            population: Some(1),
            subject: Some(String::new()),
            district: Some(String::new()),
            coords: Some(RawCoords {
                lat: Some(String::new()),
                lon: Some(String::new()),
            }),
        });
        Catalog::load(raws, RecordPolicy::Strict).expect("valid catalog")
    }

    #[test]
    fn letters_without_cities_are_unreachable() {
        let catalog = catalog(&["Москва", "Астрахань", "Нижний Новгород"]);
        let index = UnreachableLetters::compute(&catalog, &Alphabet::cyrillic());
        assert_eq!(index.len(), 30);
        assert!(index.contains('ь'));
        assert!(index.contains('ы'));
        assert!(!index.contains('м'));
        assert!(!index.contains('а'));
        assert!(!index.contains('н'));
    }

    #[test]
    fn letters_outside_the_alphabet_are_never_reported() {
        let catalog = catalog(&["Oslo"]);
        let index = UnreachableLetters::compute(&catalog, &Alphabet::new("ab"));
        assert_eq!(index.iter().collect::<String>(), "ab");
        assert!(!index.contains('z'));
    }

    #[test]
    fn empty_catalog_makes_every_letter_unreachable() {
        let index = UnreachableLetters::compute(&Catalog::default(), &Alphabet::cyrillic());
        assert_eq!(index.len(), 33);
    }
}
