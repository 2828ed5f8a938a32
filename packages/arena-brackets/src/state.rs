use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Uint128};
use std::collections::BTreeSet;
use std::fmt;

use crate::msg::SwissConfig;

pub type MatchId = u64;

/// Identity of whoever occupies a bracket slot.
#[cw_serde]
#[derive(Eq, PartialOrd, Ord, Hash)]
pub enum MatchParticipant {
    Individual(String),
    Team(String),
}

impl fmt::Display for MatchParticipant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchParticipant::Individual(id) => write!(f, "{}", id),
            MatchParticipant::Team(id) => write!(f, "team:{}", id),
        }
    }
}

#[cw_serde]
pub struct Participant {
    pub id: MatchParticipant,
    pub display_name: String,
    pub seed_number: Option<u32>,
    pub skill_score: Option<Decimal>,
}

impl Participant {
    pub fn individual(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: MatchParticipant::Individual(id.into()),
            display_name: display_name.into(),
            seed_number: None,
            skill_score: None,
        }
    }

    pub fn team(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: MatchParticipant::Team(id.into()),
            display_name: display_name.into(),
            seed_number: None,
            skill_score: None,
        }
    }

    pub fn with_seed(mut self, seed_number: u32) -> Self {
        self.seed_number = Some(seed_number);
        self
    }

    pub fn with_skill(mut self, skill_score: Decimal) -> Self {
        self.skill_score = Some(skill_score);
        self
    }
}

#[cw_serde]
pub enum BracketFormat {
    SingleElimination { play_third_place_match: bool },
    DoubleElimination,
    Swiss,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum BracketType {
    Winners,
    Losers,
    GrandFinals,
    ResetMatch,
    ThirdPlace,
    Swiss,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum MatchStatus {
    Pending,
    Completed,
    /// Both slots were byes, nobody advances
    Void,
}

/// Destination of a participant leaving a match
#[cw_serde]
#[derive(Copy, Eq)]
pub struct MatchLink {
    pub match_id: MatchId,
    pub slot: u8,
}

impl MatchLink {
    pub fn new(match_id: MatchId, slot: u8) -> Self {
        Self { match_id, slot }
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub struct MatchScore {
    pub slot_1: u32,
    pub slot_2: u32,
}

#[cw_serde]
pub struct BracketSlot {
    pub slot_id: String,
    pub participant: Option<MatchParticipant>,
    /// Set when no participant will ever arrive in this slot
    pub is_bye: bool,
}

impl BracketSlot {
    pub fn new(match_id: MatchId, index: u8) -> Self {
        Self {
            slot_id: format!("{}:{}", match_id, index),
            participant: None,
            is_bye: false,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.participant.is_some() || self.is_bye
    }
}

#[cw_serde]
pub struct Match {
    pub id: MatchId,
    pub round: usize,
    pub position: usize,
    pub bracket_type: BracketType,
    pub slot_1: BracketSlot,
    pub slot_2: BracketSlot,
    pub winner_id: Option<MatchParticipant>,
    pub score: Option<MatchScore>,
    pub status: MatchStatus,
    pub next_match_winner: Option<MatchLink>, // Next match for the winner
    pub next_match_loser: Option<MatchLink>,  // Next match for the loser (double elimination and 3rd place)
}

impl Match {
    pub fn new(id: MatchId, round: usize, position: usize, bracket_type: BracketType) -> Self {
        Self {
            id,
            round,
            position,
            bracket_type,
            slot_1: BracketSlot::new(id, 0),
            slot_2: BracketSlot::new(id, 1),
            winner_id: None,
            score: None,
            status: MatchStatus::Pending,
            next_match_winner: None,
            next_match_loser: None,
        }
    }

    pub fn slot(&self, index: u8) -> &BracketSlot {
        if index == 0 {
            &self.slot_1
        } else {
            &self.slot_2
        }
    }

    pub fn slot_mut(&mut self, index: u8) -> &mut BracketSlot {
        if index == 0 {
            &mut self.slot_1
        } else {
            &mut self.slot_2
        }
    }

    pub fn contains(&self, participant: &MatchParticipant) -> bool {
        self.slot_1.participant.as_ref() == Some(participant)
            || self.slot_2.participant.as_ref() == Some(participant)
    }

    /// Both slots are filled and no result has been recorded yet.
    pub fn is_playable(&self) -> bool {
        self.status == MatchStatus::Pending
            && self.slot_1.participant.is_some()
            && self.slot_2.participant.is_some()
    }

    pub fn is_resolved(&self) -> bool {
        self.status != MatchStatus::Pending
    }

    /// Completed with one participant standing in front of a bye.
    pub fn is_bye(&self) -> bool {
        self.status == MatchStatus::Completed && (self.slot_1.is_bye || self.slot_2.is_bye)
    }

    pub fn loser_id(&self) -> Option<&MatchParticipant> {
        let winner = self.winner_id.as_ref()?;
        [&self.slot_1, &self.slot_2]
            .into_iter()
            .filter_map(|slot| slot.participant.as_ref())
            .find(|participant| *participant != winner)
    }
}

#[cw_serde]
pub struct Round {
    pub round: usize,
    pub bracket_type: BracketType,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_resolved)
    }
}

#[cw_serde]
pub struct SwissStanding {
    pub participant_id: MatchParticipant,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub byes: u32,
    pub points: Uint128,
    pub opponents_faced: BTreeSet<MatchParticipant>,
}

impl SwissStanding {
    pub fn new(participant_id: MatchParticipant) -> Self {
        Self {
            participant_id,
            wins: 0,
            losses: 0,
            draws: 0,
            byes: 0,
            points: Uint128::zero(),
            opponents_faced: BTreeSet::new(),
        }
    }

    pub fn has_faced(&self, other: &MatchParticipant) -> bool {
        self.opponents_faced.contains(other)
    }
}

#[cw_serde]
pub struct SwissState {
    pub config: SwissConfig,
    pub standings: Vec<SwissStanding>,
}

#[cw_serde]
pub struct BracketInstance {
    pub format: BracketFormat,
    pub winners_rounds: Vec<Round>,
    pub losers_rounds: Vec<Round>,
    pub grand_finals: Option<Match>,
    pub reset_match: Option<Match>,
    pub third_place_match: Option<Match>,
    pub champion_id: Option<MatchParticipant>,
    pub swiss: Option<SwissState>,
}

impl BracketInstance {
    pub fn new(format: BracketFormat) -> Self {
        Self {
            format,
            winners_rounds: vec![],
            losers_rounds: vec![],
            grand_finals: None,
            reset_match: None,
            third_place_match: None,
            champion_id: None,
            swiss: None,
        }
    }

    /// Every match in play order: winners, losers, third place, grand finals, reset.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.winners_rounds
            .iter()
            .chain(self.losers_rounds.iter())
            .flat_map(|round| round.matches.iter())
            .chain(self.third_place_match.iter())
            .chain(self.grand_finals.iter())
            .chain(self.reset_match.iter())
    }

    pub fn find_match(&self, match_id: MatchId) -> Option<&Match> {
        self.matches().find(|m| m.id == match_id)
    }

    pub fn find_match_mut(&mut self, match_id: MatchId) -> Option<&mut Match> {
        self.winners_rounds
            .iter_mut()
            .chain(self.losers_rounds.iter_mut())
            .flat_map(|round| round.matches.iter_mut())
            .chain(self.third_place_match.iter_mut())
            .chain(self.grand_finals.iter_mut())
            .chain(self.reset_match.iter_mut())
            .find(|m| m.id == match_id)
    }

    pub fn match_count(&self) -> usize {
        self.matches().count()
    }

    pub fn next_match_id(&self) -> MatchId {
        self.matches().map(|m| m.id).max().unwrap_or(0) + 1
    }

    /// Matches that have both participants and are waiting for a result.
    pub fn pending_matches(&self) -> Vec<&Match> {
        self.matches().filter(|m| m.is_playable()).collect()
    }

    pub fn is_terminal(&self) -> bool {
        match self.format {
            // Crowned once the last round is in, or when no pairing is left
            BracketFormat::Swiss => {
                self.champion_id.is_some() && self.winners_rounds.iter().all(Round::is_complete)
            }
            _ => self.champion_id.is_some() && self.matches().all(Match::is_resolved),
        }
    }
}
