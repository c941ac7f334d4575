use chrono::{DateTime, Duration, Utc};

use crate::{
    engine::{MoveRecord, Phase, Player, RejectReason},
    models::CityRecord,
};

/// Something that happened during a session, forwarded to the output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The computer named the opening city.
    Opened { city: CityRecord },
    /// The human is expected to answer with a city starting with `required`.
    AwaitingHuman { required: Option<char> },
    HumanMoved { city: CityRecord },
    HumanRejected { reason: RejectReason },
    ComputerMoved { city: CityRecord },
    /// The computer found no legal city for `required`.
    ComputerStuck { required: Option<char> },
    Finished { outcome: SessionOutcome },
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    HumanLost(RejectReason),
    ComputerLost,
    /// The input source ran dry before the game was decided.
    Abandoned,
}

impl SessionOutcome {
    pub fn from_phase(phase: &Phase) -> Self {
        match phase {
            Phase::HumanLost(reason) => SessionOutcome::HumanLost(reason.clone()),
            Phase::ComputerLost => SessionOutcome::ComputerLost,
            Phase::NotStarted | Phase::InProgress => SessionOutcome::Abandoned,
        }
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            SessionOutcome::HumanLost(_) => Some(Player::Computer),
            SessionOutcome::ComputerLost => Some(Player::Human),
            SessionOutcome::Abandoned => None,
        }
    }
}

/// Summary returned once a session is over. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub moves: Vec<MoveRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionReport {
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    pub fn moves_by(&self, player: Player) -> usize {
        self.moves.iter().filter(|m| m.player == player).count()
    }
}
