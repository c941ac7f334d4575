#![allow(missing_docs)]

//! Game session loop: alternates human and computer turns until one side loses.

mod models;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::engine::{HumanOutcome, TurnEngine};

pub use models::{SessionEvent, SessionOutcome, SessionReport};

/// Supplies the human's moves, one line at a time.
pub trait MoveSource {
    /// Return the next move, or `None` once the input is exhausted.
    fn next_move(&mut self) -> Result<Option<String>>;
}

/// Receives everything worth telling the player.
pub trait EventSink {
    fn emit(&mut self, event: &SessionEvent) -> Result<()>;
}

/// Drive `engine` from start to a terminal state.
///
/// The loop holds no game state of its own; it only sequences engine calls
/// and forwards what happened to `sink`.
pub fn run_session<S, K>(
    engine: &mut TurnEngine,
    source: &mut S,
    sink: &mut K,
) -> Result<SessionReport>
where
    S: MoveSource + ?Sized,
    K: EventSink + ?Sized,
{
    let started_at = Utc::now();

    match engine.start()? {
        Some(city) => sink.emit(&SessionEvent::Opened { city })?,
        None => sink.emit(&SessionEvent::ComputerStuck { required: None })?,
    }

    while !engine.phase().is_terminal() {
        let required = engine.required_letter();
        sink.emit(&SessionEvent::AwaitingHuman { required })?;

        let Some(input) = source.next_move()? else {
            info!("input closed, abandoning session");
            break;
        };

        match engine.human_turn(&input)? {
            HumanOutcome::Accepted(city) => sink.emit(&SessionEvent::HumanMoved { city })?,
            HumanOutcome::Rejected(reason) => {
                sink.emit(&SessionEvent::HumanRejected { reason })?;
                break;
            }
        }

        let required = engine.required_letter();
        match engine.computer_turn()? {
            Some(city) => sink.emit(&SessionEvent::ComputerMoved { city })?,
            None => sink.emit(&SessionEvent::ComputerStuck { required })?,
        }
    }

    let outcome = SessionOutcome::from_phase(engine.phase());
    sink.emit(&SessionEvent::Finished {
        outcome: outcome.clone(),
    })?;
    info!(?outcome, moves = engine.history().len(), "session finished");

    Ok(SessionReport {
        outcome,
        moves: engine.history().to_vec(),
        started_at,
        finished_at: Utc::now(),
    })
}
