use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint64;
use itertools::Itertools;

use crate::{
    state::{BracketFormat, MatchId, MatchParticipant, MatchScore, Participant},
    BracketError, ValidationError,
};

#[cw_serde]
#[derive(Default)]
pub enum SeedingPolicy {
    /// Ascending by each participant's seed number
    #[default]
    Manual,
    /// Fisher-Yates shuffle, reproducible when a seed is given
    Random { seed: Option<u64> },
    /// Descending by skill score
    SkillBased,
}

#[cw_serde]
pub struct SwissConfig {
    pub number_of_rounds: u32,
    pub points_for_win: Uint64,
    pub points_for_draw: Uint64,
    pub points_for_loss: Uint64,
    /// Defaults to the points for a win
    pub points_for_bye: Option<Uint64>,
}

impl SwissConfig {
    pub fn bye_points(&self) -> Uint64 {
        self.points_for_bye.unwrap_or(self.points_for_win)
    }
}

impl Default for SwissConfig {
    fn default() -> Self {
        Self {
            number_of_rounds: 3,
            points_for_win: Uint64::new(3),
            points_for_draw: Uint64::one(),
            points_for_loss: Uint64::zero(),
            points_for_bye: None,
        }
    }
}

#[cw_serde]
pub struct TournamentConfig {
    pub format: BracketFormat,
    #[serde(default)]
    pub seeding_policy: SeedingPolicy,
    pub swiss: Option<SwissConfig>,
}

impl TournamentConfig {
    pub fn single_elimination(seeding_policy: SeedingPolicy) -> Self {
        Self {
            format: BracketFormat::SingleElimination {
                play_third_place_match: false,
            },
            seeding_policy,
            swiss: None,
        }
    }

    pub fn double_elimination(seeding_policy: SeedingPolicy) -> Self {
        Self {
            format: BracketFormat::DoubleElimination,
            seeding_policy,
            swiss: None,
        }
    }

    pub fn swiss(seeding_policy: SeedingPolicy, swiss: SwissConfig) -> Self {
        Self {
            format: BracketFormat::Swiss,
            seeding_policy,
            swiss: Some(swiss),
        }
    }

    /// Checks the roster and the format options before any bracket is built.
    pub fn validate(&self, participants: &[Participant]) -> Result<(), BracketError> {
        validate_roster(participants)?;

        match &self.format {
            BracketFormat::SingleElimination {
                play_third_place_match,
            } => {
                if *play_third_place_match && participants.len() < 4 {
                    return Err(ValidationError::ThirdPlaceRequiresFour {
                        count: participants.len(),
                    }
                    .into());
                }
            }
            BracketFormat::DoubleElimination => {}
            BracketFormat::Swiss => {
                let swiss = self.swiss.as_ref().ok_or(ValidationError::MissingSwissConfig {})?;
                if swiss.number_of_rounds == 0 {
                    return Err(ValidationError::InvalidRoundCount {}.into());
                }
            }
        }

        Ok(())
    }
}

pub fn validate_roster(participants: &[Participant]) -> Result<(), BracketError> {
    if participants.len() < 2 {
        return Err(ValidationError::TooFewParticipants {
            count: participants.len(),
        }
        .into());
    }
    if let Some(duplicate) = participants.iter().map(|p| &p.id).duplicates().next() {
        return Err(ValidationError::DuplicateParticipant {
            id: duplicate.clone(),
        }
        .into());
    }

    Ok(())
}

#[cw_serde]
pub struct MatchResultMsg {
    pub match_id: MatchId,
    /// None records a draw, which only Swiss rounds accept
    pub winner: Option<MatchParticipant>,
    pub score: Option<MatchScore>,
}

impl MatchResultMsg {
    pub fn win(match_id: MatchId, winner: MatchParticipant) -> Self {
        Self {
            match_id,
            winner: Some(winner),
            score: None,
        }
    }

    pub fn draw(match_id: MatchId) -> Self {
        Self {
            match_id,
            winner: None,
            score: None,
        }
    }

    pub fn with_score(mut self, slot_1: u32, slot_2: u32) -> Self {
        self.score = Some(MatchScore { slot_1, slot_2 });
        self
    }
}
