use arena_brackets::{
    msg::TournamentConfig,
    state::{BracketInstance, MatchParticipant, MatchStatus, Participant},
};

use crate::simulate::SimulationFile;

pub fn individuals(count: usize) -> Vec<Participant> {
    (1..=count)
        .map(|i| Participant::individual(format!("player{}", i), format!("Player {}", i)))
        .collect()
}

pub fn seeded(participants: Vec<Participant>) -> Vec<Participant> {
    participants
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.with_seed(i as u32 + 1))
        .collect()
}

pub fn simulation(config: TournamentConfig, participants: Vec<Participant>) -> SimulationFile {
    SimulationFile {
        config,
        participants,
    }
}

pub fn wins(bracket: &BracketInstance, participant: &MatchParticipant) -> usize {
    bracket
        .matches()
        .filter(|m| m.status == MatchStatus::Completed && !m.is_bye())
        .filter(|m| m.winner_id.as_ref() == Some(participant))
        .count()
}
