use log::debug;
use std::collections::HashSet;

use crate::{
    advance::resolve_byes,
    single_elimination::{build_winners_bracket, first_round_queue},
    state::{BracketFormat, BracketInstance, BracketType, Match, MatchId, MatchLink, Participant, Round},
    topology::BracketTopology,
    BracketError,
};

/// Builds a double elimination bracket from participants already in seed order.
///
/// `topology` must come from [`BracketTopology::compute_double`]. Round indices
/// are global: winners rounds first, then losers rounds, then grand finals; the
/// reset match, when needed, takes the index after grand finals.
pub fn build(seeds: &[Participant], topology: &BracketTopology) -> Result<BracketInstance, BracketError> {
    let expected_losers_rounds = 2 * topology.rounds.saturating_sub(1);
    if topology.losers_rounds() != expected_losers_rounds {
        return Err(BracketError::invariant(format!(
            "expected {} losers rounds for {} winners rounds, topology has {}",
            expected_losers_rounds,
            topology.rounds,
            topology.losers_rounds()
        )));
    }

    let mut bracket = BracketInstance::new(BracketFormat::DoubleElimination);
    let mut next_id: MatchId = 1;

    build_winners_bracket(&mut bracket, seeds, topology, &mut next_id)?;

    // Create the losers bracket rounds
    for (i, &count) in topology.losers_matches_per_round.iter().enumerate() {
        let round = topology.rounds + i;
        let matches = (0..count)
            .map(|position| {
                let match_ = Match::new(next_id, round, position, BracketType::Losers);
                next_id += 1;
                match_
            })
            .collect();
        bracket.losers_rounds.push(Round {
            round,
            bracket_type: BracketType::Losers,
            matches,
        });
    }

    let grand_finals = Match::new(
        next_id,
        topology.rounds + topology.losers_rounds(),
        0,
        BracketType::GrandFinals,
    );
    let grand_finals_id = grand_finals.id;
    bracket.grand_finals = Some(grand_finals);

    // Slots promised to someone; drops fill around them
    let mut taken: HashSet<(MatchId, u8)> = HashSet::new();

    link_losers_bracket(&mut bracket, topology, grand_finals_id, &mut taken)?;
    link_winners_drops(&mut bracket, topology, grand_finals_id, &mut taken)?;

    // Winners bracket champion takes grand finals slot 1
    let winners_final = bracket
        .winners_rounds
        .last_mut()
        .and_then(|round| round.matches.first_mut())
        .ok_or_else(|| BracketError::invariant("winners bracket has no final"))?;
    winners_final.next_match_winner = Some(MatchLink::new(grand_finals_id, 0));

    let first_round = first_round_queue(&bracket);
    resolve_byes(&mut bracket, first_round)?;

    debug!(
        "double elimination bracket built: {} participants, {} winners rounds, {} losers rounds",
        topology.participants,
        topology.rounds,
        topology.losers_rounds()
    );
    Ok(bracket)
}

/// Survivors of each losers round move on per the topology table; the losers
/// final sends its winner to grand finals slot 2.
fn link_losers_bracket(
    bracket: &mut BracketInstance,
    topology: &BracketTopology,
    grand_finals_id: MatchId,
    taken: &mut HashSet<(MatchId, u8)>,
) -> Result<(), BracketError> {
    let last = topology.losers_rounds().saturating_sub(1);

    for round in 0..topology.losers_rounds() {
        let next_ids: Vec<MatchId> = bracket
            .losers_rounds
            .get(round + 1)
            .map(|r| r.matches.iter().map(|m| m.id).collect())
            .unwrap_or_default();

        for match_ in bracket.losers_rounds[round].matches.iter_mut() {
            let link = if round == last {
                MatchLink::new(grand_finals_id, 1)
            } else {
                let (position, slot) = topology
                    .losers_advance(round, match_.position)
                    .ok_or_else(|| {
                        BracketError::invariant(format!("losers round {} has no next round", round))
                    })?;
                let target = next_ids.get(position).ok_or_else(|| {
                    BracketError::invariant(format!(
                        "losers round {} position {} advances outside round {}",
                        round,
                        match_.position,
                        round + 1
                    ))
                })?;
                MatchLink::new(*target, slot)
            };

            if !taken.insert((link.match_id, link.slot)) {
                return Err(BracketError::invariant(format!(
                    "losers match {} advances into a slot already promised",
                    match_.id
                )));
            }
            match_.next_match_winner = Some(link);
        }
    }

    Ok(())
}

/// Every winners bracket loser gets a losers bracket slot: drop round at
/// position `p mod count`, first free slot, scanning forward through the round
/// and then into the next round.
fn link_winners_drops(
    bracket: &mut BracketInstance,
    topology: &BracketTopology,
    grand_finals_id: MatchId,
    taken: &mut HashSet<(MatchId, u8)>,
) -> Result<(), BracketError> {
    for winners_round in 0..topology.rounds {
        for position in 0..bracket.winners_rounds[winners_round].matches.len() {
            let link = match topology.losers_drop_round(winners_round) {
                Some(losers_round) => find_drop_slot(bracket, losers_round, position, taken)?,
                // No losers bracket, the winners final loser goes straight to grand finals
                None => MatchLink::new(grand_finals_id, 1),
            };
            if !taken.insert((link.match_id, link.slot)) {
                return Err(BracketError::invariant(format!(
                    "winners round {} position {} drops into a slot already promised",
                    winners_round, position
                )));
            }
            bracket.winners_rounds[winners_round].matches[position].next_match_loser = Some(link);
        }
    }

    Ok(())
}

fn find_drop_slot(
    bracket: &BracketInstance,
    losers_round: usize,
    position: usize,
    taken: &HashSet<(MatchId, u8)>,
) -> Result<MatchLink, BracketError> {
    let round = bracket
        .losers_rounds
        .get(losers_round)
        .ok_or_else(|| BracketError::invariant(format!("losers round {} missing", losers_round)))?;
    let start = position % round.matches.len().max(1);

    let free = |match_: &Match| {
        (0..2u8)
            .find(|slot| !taken.contains(&(match_.id, *slot)))
            .map(|slot| MatchLink::new(match_.id, slot))
    };

    round.matches[start..]
        .iter()
        .find_map(free)
        .or_else(|| {
            bracket
                .losers_rounds
                .get(losers_round + 1)
                .and_then(|next| next.matches.iter().find_map(free))
        })
        .ok_or_else(|| {
            BracketError::invariant(format!(
                "no free losers bracket slot from round {} position {}",
                losers_round, start
            ))
        })
}
