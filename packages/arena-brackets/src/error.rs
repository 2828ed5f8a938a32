use thiserror::Error;

use crate::state::{MatchId, MatchParticipant, MatchStatus};

#[derive(Error, Debug, PartialEq)]
pub enum BracketError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    State(#[from] StateError),

    /// Topology arithmetic produced something impossible; the bracket is left untouched.
    #[error("Invariant violation: {msg}")]
    InvariantViolation { msg: String },
}

impl BracketError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        BracketError::InvariantViolation { msg: msg.into() }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("At least 2 participants should be provided, got {count}")]
    TooFewParticipants { count: usize },

    #[error("Participants should not contain duplicates: {id}")]
    DuplicateParticipant { id: MatchParticipant },

    #[error("Participant {id} has no seed number")]
    MissingSeedNumber { id: MatchParticipant },

    #[error("Seed number {seed_number} is assigned more than once")]
    DuplicateSeedNumber { seed_number: u32 },

    #[error("At least 4 participants should be provided for a 3rd place match, got {count}")]
    ThirdPlaceRequiresFour { count: usize },

    #[error("Swiss tournaments require a Swiss configuration")]
    MissingSwissConfig {},

    #[error("Swiss tournaments require at least one round")]
    InvalidRoundCount {},

    #[error("Match {match_id} not found")]
    MatchNotFound { match_id: MatchId },

    #[error("Match {match_id} is not populated yet")]
    MatchNotReady { match_id: MatchId },

    #[error("{winner} is not playing in match {match_id}")]
    WinnerNotInMatch {
        match_id: MatchId,
        winner: MatchParticipant,
    },

    #[error("Match {match_id} cannot end in a draw")]
    DrawNotAllowed { match_id: MatchId },

    #[error("Score {slot_1}-{slot_2} does not agree with the result submitted for match {match_id}")]
    ScoreMismatch {
        match_id: MatchId,
        slot_1: u32,
        slot_2: u32,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    #[error("Tournament is already complete")]
    BracketComplete {},

    #[error("Match {match_id} is already resolved ({status:?})")]
    MatchResolved { match_id: MatchId, status: MatchStatus },

    #[error("Slot {slot_id} is already taken by {occupant}, cannot place {incoming}")]
    SlotOccupied {
        slot_id: String,
        occupant: MatchParticipant,
        incoming: MatchParticipant,
    },
}
