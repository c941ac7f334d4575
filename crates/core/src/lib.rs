#![warn(clippy::all, missing_docs)]

//! Core logic for the cities word game.
//!
//! This crate hosts the city catalog, the turn engine and session loop,
//! configuration handling and dataset loading used by the terminal
//! front-end.

pub mod alphabet;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod models;
pub mod session;
pub mod unreachable;

pub use alphabet::Alphabet;
pub use catalog::{Catalog, CatalogError, RecordPolicy};
pub use config::AppConfig;
pub use dataset::{DatasetError, DatasetLoad};
pub use engine::{
    EngineError, GameState, HumanOutcome, MoveRecord, Phase, Player, RejectReason, TurnEngine,
};
pub use models::CityRecord;
pub use session::{run_session, EventSink, MoveSource, SessionEvent, SessionOutcome, SessionReport};
pub use unreachable::UnreachableLetters;
