mod advance;
pub mod double_elimination;
mod error;
pub mod msg;
pub mod query;
pub mod seeding;
pub mod single_elimination;
pub mod state;
pub mod submission;
pub mod swiss;
pub mod topology;

pub use crate::error::{BracketError, StateError, ValidationError};
pub use submission::{process_matches, submit_result};

use log::info;

use crate::{
    msg::TournamentConfig,
    state::{BracketFormat, BracketInstance, Participant},
    topology::BracketTopology,
};

/// Seeds the roster and builds the initial bracket for the configured format.
pub fn create_bracket(
    participants: &[Participant],
    config: &TournamentConfig,
) -> Result<BracketInstance, BracketError> {
    config.validate(participants)?;

    let seeds = seeding::order(participants, &config.seeding_policy)?;

    let bracket = match &config.format {
        BracketFormat::SingleElimination {
            play_third_place_match,
        } => {
            let topology = BracketTopology::compute(seeds.len())?;
            single_elimination::build(&seeds, &topology, *play_third_place_match)?
        }
        BracketFormat::DoubleElimination => {
            let topology = BracketTopology::compute_double(seeds.len())?;
            double_elimination::build(&seeds, &topology)?
        }
        BracketFormat::Swiss => {
            let swiss = config
                .swiss
                .as_ref()
                .ok_or(ValidationError::MissingSwissConfig {})?;
            swiss::build(&seeds, swiss)?
        }
    };

    info!(
        "created {:?} bracket for {} participants with {} matches",
        config.format,
        seeds.len(),
        bracket.match_count()
    );
    Ok(bracket)
}
