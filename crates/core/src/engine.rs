#![allow(missing_docs)]

//! Turn engine: legality checks, used-city tracking and the computer's move.
//!
//! The engine owns the per-game [`GameState`] and only reads the shared
//! [`Catalog`], so several engines can run against one catalog.

use std::{collections::HashSet, fmt, sync::Arc};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    alphabet::Alphabet,
    catalog::Catalog,
    models::{first_letter, last_letter, normalize, CityRecord},
    unreachable::UnreachableLetters,
};

/// Side taking a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    Human,
    Computer,
}

/// Why a human move was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The name is not in the catalog.
    UnknownCity { input: String },
    /// The name starts with the wrong letter.
    WrongLetter { required: char, found: char },
    /// The city was already named in this game.
    AlreadyUsed { city: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownCity { input } => write!(f, "unknown city {input:?}"),
            RejectReason::WrongLetter { required, found } => {
                write!(f, "expected a city starting with '{required}', got '{found}'")
            }
            RejectReason::AlreadyUsed { city } => write!(f, "{city:?} was already used"),
        }
    }
}

/// Lifecycle of a single game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    HumanLost(RejectReason),
    ComputerLost,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::HumanLost(_) | Phase::ComputerLost)
    }
}

/// Result of feeding a human move to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanOutcome {
    Accepted(CityRecord),
    Rejected(RejectReason),
}

/// A transition was requested from a state that does not allow it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("game already started")]
    AlreadyStarted,
    #[error("game is not in progress (phase: {0:?})")]
    NotInProgress(Phase),
}

/// One accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Player,
    pub city: CityRecord,
}

/// Mutable per-game state, separate from the catalog.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    used: HashSet<String>,
    required: Option<char>,
    unreachable: UnreachableLetters,
}

impl GameState {
    pub fn new(unreachable: UnreachableLetters) -> Self {
        Self {
            used: HashSet::new(),
            required: None,
            unreachable,
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(&normalize(name))
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn required_letter(&self) -> Option<char> {
        self.required
    }

    pub fn unreachable(&self) -> &UnreachableLetters {
        &self.unreachable
    }

    fn mark_used(&mut self, record: &CityRecord) {
        self.used.insert(record.normalized_name());
        self.required = last_letter(&record.name);
    }
}

pub struct TurnEngine {
    catalog: Arc<Catalog>,
    state: GameState,
    phase: Phase,
    history: Vec<MoveRecord>,
}

impl TurnEngine {
    pub fn new(catalog: Arc<Catalog>, alphabet: &Alphabet) -> Self {
        let unreachable = UnreachableLetters::compute(&catalog, alphabet);
        Self {
            catalog,
            state: GameState::new(unreachable),
            phase: Phase::NotStarted,
            history: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn required_letter(&self) -> Option<char> {
        self.state.required
    }

    /// Open the game with the first city in catalog order.
    ///
    /// Returns `None` when the catalog is empty, in which case the computer
    /// has nothing to open with and loses immediately.
    pub fn start(&mut self) -> Result<Option<CityRecord>, EngineError> {
        if self.phase != Phase::NotStarted {
            return Err(EngineError::AlreadyStarted);
        }

        let Some(opening) = self.catalog.records().first().cloned() else {
            info!("catalog is empty, computer cannot open");
            self.phase = Phase::ComputerLost;
            return Ok(None);
        };

        self.record_move(Player::Computer, &opening);
        self.phase = Phase::InProgress;
        info!(city = %opening.name, required = ?self.state.required, "game started");
        Ok(Some(opening))
    }

    /// Validate and apply a human move. A rejected move ends the game.
    pub fn human_turn(&mut self, input: &str) -> Result<HumanOutcome, EngineError> {
        self.ensure_in_progress()?;

        let record = match self.check_human_move(input) {
            Ok(record) => record,
            Err(reason) => {
                info!(%reason, "human move rejected");
                self.phase = Phase::HumanLost(reason.clone());
                return Ok(HumanOutcome::Rejected(reason));
            }
        };

        self.record_move(Player::Human, &record);
        debug!(city = %record.name, required = ?self.state.required, "human move accepted");
        Ok(HumanOutcome::Accepted(record))
    }

    /// Pick the computer's reply, or declare the computer lost when no
    /// candidate is left.
    pub fn computer_turn(&mut self) -> Result<Option<CityRecord>, EngineError> {
        self.ensure_in_progress()?;

        let Some(choice) = self.candidates().next().cloned() else {
            info!(required = ?self.state.required, "computer has no move");
            self.phase = Phase::ComputerLost;
            return Ok(None);
        };

        self.record_move(Player::Computer, &choice);
        debug!(city = %choice.name, required = ?self.state.required, "computer moved");
        Ok(Some(choice))
    }

    /// Legal computer moves in catalog order, skipping cities that end on a
    /// letter no city starts with.
    pub fn candidates(&self) -> impl Iterator<Item = &CityRecord> + '_ {
        let required = self.state.required;
        self.catalog.records().iter().filter(move |record| {
            let first = first_letter(&record.name);
            let ends_in_dead_end = last_letter(&record.name)
                .map(|letter| self.state.unreachable.contains(letter))
                .unwrap_or(true);
            (required.is_none() || first == required)
                && !self.state.is_used(&record.name)
                && !ends_in_dead_end
        })
    }

    fn check_human_move(&self, input: &str) -> Result<CityRecord, RejectReason> {
        let record = self
            .catalog
            .lookup(input)
            .cloned()
            .ok_or_else(|| RejectReason::UnknownCity {
                input: input.trim().to_string(),
            })?;

        if let (Some(required), Some(found)) = (self.state.required, first_letter(&record.name)) {
            if required != found {
                return Err(RejectReason::WrongLetter { required, found });
            }
        }

        if self.state.is_used(&record.name) {
            return Err(RejectReason::AlreadyUsed { city: record.name });
        }

        Ok(record)
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        match self.phase {
            Phase::InProgress => Ok(()),
            ref other => Err(EngineError::NotInProgress(other.clone())),
        }
    }

    fn record_move(&mut self, player: Player, record: &CityRecord) {
        self.state.mark_used(record);
        self.history.push(MoveRecord {
            player,
            city: record.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecordPolicy;
    use crate::models::{RawCity, RawCoords};

    fn catalog(names: &[&str]) -> Arc<Catalog> {
        let raws = names.iter().map(|name| RawCity {
            name: Some(name.to_string()),
            population: Some(1),
            subject: Some("s".to_string()),
            district: Some("d".to_string()),
            coords: Some(RawCoords {
                lat: Some("0".to_string()),
                lon: Some("0".to_string()),
            }),
        });
        Arc::new(Catalog::load(raws, RecordPolicy::Strict).expect("valid catalog"))
    }

    fn engine(names: &[&str]) -> TurnEngine {
        TurnEngine::new(catalog(names), &Alphabet::cyrillic())
    }

    #[test]
    fn start_opens_with_first_city() -> Result<(), EngineError> {
        let mut engine = engine(&["Москва", "Астрахань", "Нижний Новгород"]);
        let opening = engine.start()?.expect("opening city");
        assert_eq!(opening.name, "Москва");
        assert_eq!(engine.required_letter(), Some('а'));
        assert!(engine.state().is_used("МОСКВА"));
        assert_eq!(engine.phase(), &Phase::InProgress);
        assert_eq!(engine.start(), Err(EngineError::AlreadyStarted));
        Ok(())
    }

    #[test]
    fn computer_loses_when_nothing_starts_with_soft_sign() -> Result<(), EngineError> {
        let mut engine = engine(&["Москва", "Астрахань", "Нижний Новгород"]);
        engine.start()?;
        let outcome = engine.human_turn("астрахань")?;
        assert!(matches!(outcome, HumanOutcome::Accepted(ref city) if city.name == "Астрахань"));
        assert_eq!(engine.required_letter(), Some('ь'));
        assert_eq!(engine.computer_turn()?, None);
        assert_eq!(engine.phase(), &Phase::ComputerLost);
        assert!(engine.phase().is_terminal());
        Ok(())
    }

    #[test]
    fn unknown_city_loses() -> Result<(), EngineError> {
        let mut engine = engine(&["Москва", "Астрахань"]);
        engine.start()?;
        let outcome = engine.human_turn("Атлантида")?;
        let reason = RejectReason::UnknownCity {
            input: "Атлантида".to_string(),
        };
        assert_eq!(outcome, HumanOutcome::Rejected(reason.clone()));
        assert_eq!(engine.phase(), &Phase::HumanLost(reason));
        assert!(matches!(
            engine.computer_turn(),
            Err(EngineError::NotInProgress(Phase::HumanLost(_)))
        ));
        Ok(())
    }

    #[test]
    fn wrong_letter_reports_required_letter() -> Result<(), EngineError> {
        let mut engine = engine(&["Москва", "Астрахань", "Нижний Новгород"]);
        engine.start()?;
        let required = engine.required_letter().expect("letter set");
        let used_before = engine.state().used_count();
        let outcome = engine.human_turn("Нижний Новгород")?;
        assert_eq!(
            outcome,
            HumanOutcome::Rejected(RejectReason::WrongLetter {
                required,
                found: 'н'
            })
        );
        assert_eq!(engine.state().used_count(), used_before);
        Ok(())
    }

    #[test]
    fn reused_city_loses() -> Result<(), EngineError> {
        let mut engine = engine(&["Анапа", "Абакан", "Нальчик"]);
        engine.start()?;
        assert_eq!(engine.required_letter(), Some('а'));
        let outcome = engine.human_turn("анапа")?;
        assert_eq!(
            outcome,
            HumanOutcome::Rejected(RejectReason::AlreadyUsed {
                city: "Анапа".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn computer_picks_first_legal_candidate() -> Result<(), EngineError> {
        // "Нарьян-Мар" ends on 'р', which no city starts with, so it is pruned.
        let mut engine = engine(&["Москва", "Абакан", "Нарьян-Мар", "Надым", "Нальчик"]);
        engine.start()?;
        engine.human_turn("Абакан")?;
        let reply = engine.computer_turn()?.expect("computer reply");
        assert_eq!(reply.name, "Надым");
        assert_eq!(engine.required_letter(), Some('м'));
        assert_eq!(engine.phase(), &Phase::InProgress);
        Ok(())
    }

    #[test]
    fn computer_moves_satisfy_rules() -> Result<(), EngineError> {
        let mut engine = engine(&["Москва", "Абакан", "Анапа", "Нальчик", "Калуга", "Курск"]);
        engine.start()?;
        engine.human_turn("Анапа")?;
        let required = engine.required_letter();
        let planned = engine.candidates().next().cloned().expect("candidate");
        assert!(!engine.state().is_used(&planned.name));
        let reply = engine.computer_turn()?.expect("reply");
        assert_eq!(reply, planned);
        assert_eq!(first_letter(&reply.name), required);
        assert!(!engine
            .state()
            .unreachable()
            .contains(last_letter(&reply.name).expect("letter")));
        assert_eq!(engine.history().len(), 3);
        assert_eq!(engine.history()[2].player, Player::Computer);
        Ok(())
    }

    #[test]
    fn computer_skips_cities_already_named() -> Result<(), EngineError> {
        let mut engine = engine(&["Москва", "Анапа", "Абакан", "Нальчик"]);
        engine.start()?;
        engine.human_turn("Анапа")?;
        assert!(engine.state().is_used("Анапа"));
        let reply = engine.computer_turn()?.expect("computer reply");
        assert_eq!(reply.name, "Абакан");
        assert_eq!(engine.required_letter(), Some('н'));
        Ok(())
    }

    #[test]
    fn empty_catalog_computer_loses_at_start() -> Result<(), EngineError> {
        let mut engine = TurnEngine::new(Arc::new(Catalog::default()), &Alphabet::cyrillic());
        assert_eq!(engine.start()?, None);
        assert_eq!(engine.phase(), &Phase::ComputerLost);
        assert!(engine.human_turn("Москва").is_err());
        Ok(())
    }

    #[test]
    fn moves_before_start_are_refused() {
        let mut engine = engine(&["Москва"]);
        assert_eq!(
            engine.human_turn("Москва"),
            Err(EngineError::NotInProgress(Phase::NotStarted))
        );
    }
}
