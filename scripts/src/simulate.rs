use anyhow::{bail, Context};
use arena_brackets::{
    create_bracket,
    msg::{MatchResultMsg, TournamentConfig},
    query::placements,
    state::{BracketInstance, MatchParticipant, Participant},
    submit_result,
};
use cosmwasm_schema::cw_serde;
use log::{debug, info};
use std::{cmp::Reverse, fs};

/// Upper bound on submitted results before a simulation is considered stuck
const MAX_RESULTS: usize = 100_000;

#[cw_serde]
pub struct SimulationFile {
    pub config: TournamentConfig,
    pub participants: Vec<Participant>,
}

#[cw_serde]
pub struct SimulationReport {
    pub bracket: BracketInstance,
    pub placements: Vec<MatchParticipant>,
    pub results_submitted: u64,
}

pub fn load(path: &str) -> anyhow::Result<SimulationFile> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let file = serde_json::from_str(&contents).with_context(|| format!("parsing {}", path))?;
    Ok(file)
}

/// Builds the bracket and plays it to the end. Every match goes to the lower
/// seed number, then the higher skill score, then the earlier roster entry.
pub fn run(file: &SimulationFile) -> anyhow::Result<SimulationReport> {
    let mut bracket = create_bracket(&file.participants, &file.config)?;
    info!(
        "simulating {} participants, {} matches scheduled",
        file.participants.len(),
        bracket.match_count()
    );

    let rank = |participant: &MatchParticipant| {
        file.participants
            .iter()
            .enumerate()
            .find(|(_, p)| p.id == *participant)
            .map(|(position, p)| {
                (
                    p.seed_number.unwrap_or(u32::MAX),
                    Reverse(p.skill_score),
                    position,
                )
            })
            .unwrap_or((u32::MAX, Reverse(None), usize::MAX))
    };

    let mut results_submitted = 0u64;
    for _ in 0..MAX_RESULTS {
        let result = match bracket.pending_matches().first() {
            Some(match_) => {
                let winner = match (&match_.slot_1.participant, &match_.slot_2.participant) {
                    (Some(a), Some(b)) => {
                        if rank(a) <= rank(b) {
                            a.clone()
                        } else {
                            b.clone()
                        }
                    }
                    _ => bail!("match {} is pending without two participants", match_.id),
                };
                debug!("match {}: {} wins", match_.id, winner);
                MatchResultMsg::win(match_.id, winner)
            }
            None => break,
        };

        bracket = submit_result(&bracket, result)?;
        results_submitted += 1;
    }

    if !bracket.is_terminal() {
        bail!(
            "bracket stopped after {} results without finishing",
            results_submitted
        );
    }

    if let Some(champion) = &bracket.champion_id {
        info!(
            "{} wins after {} submitted results",
            champion, results_submitted
        );
    }

    Ok(SimulationReport {
        placements: placements(&bracket),
        bracket,
        results_submitted,
    })
}
