use log::debug;
use std::collections::VecDeque;

use crate::{
    advance::resolve_byes,
    state::{
        BracketFormat, BracketInstance, BracketType, Match, MatchId, MatchLink, Participant, Round,
    },
    topology::{seed_placement, BracketTopology},
    BracketError, ValidationError,
};

/// Builds a single elimination bracket from participants already in seed order.
///
/// Byes are resolved before returning, so the first playable round may already
/// contain participants who advanced without playing.
pub fn build(
    seeds: &[Participant],
    topology: &BracketTopology,
    play_third_place_match: bool,
) -> Result<BracketInstance, BracketError> {
    if play_third_place_match && seeds.len() < 4 {
        return Err(ValidationError::ThirdPlaceRequiresFour { count: seeds.len() }.into());
    }

    let mut bracket = BracketInstance::new(BracketFormat::SingleElimination {
        play_third_place_match,
    });
    let mut next_id: MatchId = 1;

    build_winners_bracket(&mut bracket, seeds, topology, &mut next_id)?;

    // Optionally add a third place match fed by the semifinal losers
    if play_third_place_match {
        let third_place = Match::new(next_id, topology.rounds - 1, 0, BracketType::ThirdPlace);
        let semifinals = bracket
            .winners_rounds
            .get_mut(topology.rounds - 2)
            .ok_or_else(|| BracketError::invariant("third place match without semifinals"))?;
        for match_ in semifinals.matches.iter_mut() {
            match_.next_match_loser = Some(MatchLink::new(
                third_place.id,
                (match_.position % 2) as u8,
            ));
        }
        bracket.third_place_match = Some(third_place);
    }

    let first_round = first_round_queue(&bracket);
    resolve_byes(&mut bracket, first_round)?;

    debug!(
        "single elimination bracket built: {} participants, {} rounds, {} byes",
        topology.participants, topology.rounds, topology.byes
    );
    Ok(bracket)
}

/// Lays out the winners bracket rounds, links each match to the next round and
/// seats the seeds in round 0. Unused seed positions become byes.
pub(crate) fn build_winners_bracket(
    bracket: &mut BracketInstance,
    seeds: &[Participant],
    topology: &BracketTopology,
    next_id: &mut MatchId,
) -> Result<(), BracketError> {
    if seeds.len() != topology.participants {
        return Err(BracketError::invariant(format!(
            "topology computed for {} participants but {} seeds were supplied",
            topology.participants,
            seeds.len()
        )));
    }

    for (round, &count) in topology.matches_per_round.iter().enumerate() {
        let matches = (0..count)
            .map(|position| {
                let match_ = Match::new(*next_id, round, position, BracketType::Winners);
                *next_id += 1;
                match_
            })
            .collect();
        bracket.winners_rounds.push(Round {
            round,
            bracket_type: BracketType::Winners,
            matches,
        });
    }

    // Winner of (round, position) moves to (round + 1, position / 2)
    for round in 0..topology.rounds.saturating_sub(1) {
        let next_ids: Vec<MatchId> = bracket.winners_rounds[round + 1]
            .matches
            .iter()
            .map(|m| m.id)
            .collect();
        for match_ in bracket.winners_rounds[round].matches.iter_mut() {
            let target = next_ids.get(match_.position / 2).ok_or_else(|| {
                BracketError::invariant(format!(
                    "round {} position {} has no next match",
                    round, match_.position
                ))
            })?;
            match_.next_match_winner =
                Some(MatchLink::new(*target, (match_.position % 2) as u8));
        }
    }

    let first_round = bracket
        .winners_rounds
        .first_mut()
        .ok_or_else(|| BracketError::invariant("bracket has no rounds"))?;
    for seed in 1..=topology.perfect_size {
        let (position, slot) = seed_placement(seed, topology);
        let match_ = first_round.matches.get_mut(position).ok_or_else(|| {
            BracketError::invariant(format!("seed {} placed outside round 0", seed))
        })?;
        let slot = match_.slot_mut(slot);
        match seeds.get(seed - 1) {
            Some(participant) => slot.participant = Some(participant.id.clone()),
            None => slot.is_bye = true,
        }
    }

    Ok(())
}

pub(crate) fn first_round_queue(bracket: &BracketInstance) -> VecDeque<MatchId> {
    bracket
        .winners_rounds
        .first()
        .map(|round| round.matches.iter().map(|m| m.id).collect())
        .unwrap_or_default()
}
