use cosmwasm_std::{Uint128, Uint64};
use itertools::Itertools;
use log::{debug, info};

use crate::{
    msg::SwissConfig,
    state::{
        BracketFormat, BracketInstance, BracketType, Match, MatchId, MatchParticipant,
        MatchStatus, Participant, Round, SwissStanding, SwissState,
    },
    BracketError, ValidationError,
};

/// Creates a Swiss bracket and pairs its first round.
///
/// Seed order breaks ties in the first pairing, since every standing starts even.
pub fn build(seeds: &[Participant], config: &SwissConfig) -> Result<BracketInstance, BracketError> {
    if config.number_of_rounds == 0 {
        return Err(ValidationError::InvalidRoundCount {}.into());
    }

    let mut bracket = BracketInstance::new(BracketFormat::Swiss);
    bracket.swiss = Some(SwissState {
        config: config.clone(),
        standings: initial_standings(seeds),
    });

    start_next_round(&mut bracket)?;
    Ok(bracket)
}

pub fn initial_standings(seeds: &[Participant]) -> Vec<SwissStanding> {
    seeds
        .iter()
        .map(|p| SwissStanding::new(p.id.clone()))
        .collect()
}

/// Pairs the next round greedily: walking the standings from the top, each
/// unmatched participant meets the best ranked unmatched participant they have
/// not played yet, or receives a bye when nobody is left for them.
///
/// Opponents already met are read from the standings, so every earlier round
/// must have its results applied. Match ids continue after the last match of
/// `previous_rounds`.
pub fn pair_round(standings: &[SwissStanding], previous_rounds: &[Round]) -> Round {
    let round_index = previous_rounds.len();
    let mut next_id: MatchId = previous_rounds
        .iter()
        .rev()
        .find_map(|round| round.matches.last())
        .map_or(0, |m| m.id)
        + 1;

    let ranked = standings
        .iter()
        .sorted_by(|a, b| (b.points, b.wins).cmp(&(a.points, a.wins)))
        .collect_vec();
    let mut matched = vec![false; ranked.len()];
    let mut matches = vec![];

    for i in 0..ranked.len() {
        if matched[i] {
            continue;
        }
        matched[i] = true;

        let opponent = (i + 1..ranked.len())
            .find(|&j| !matched[j] && !ranked[i].has_faced(&ranked[j].participant_id));

        let mut match_ = Match::new(next_id, round_index, matches.len(), BracketType::Swiss);
        next_id += 1;
        match_.slot_1.participant = Some(ranked[i].participant_id.clone());

        match opponent {
            Some(j) => {
                matched[j] = true;
                match_.slot_2.participant = Some(ranked[j].participant_id.clone());
            }
            None => {
                debug!(
                    "round {}: no unplayed opponent left for {}, bye issued",
                    round_index, ranked[i].participant_id
                );
                match_.slot_2.is_bye = true;
                match_.status = MatchStatus::Completed;
                match_.winner_id = match_.slot_1.participant.clone();
            }
        }

        matches.push(match_);
    }

    Round {
        round: round_index,
        bracket_type: BracketType::Swiss,
        matches,
    }
}

/// Adds a completed match to the standings. A bye counts as a win worth the
/// configured bye points; a completed match without a winner is a draw.
pub fn apply_result(
    standings: &mut [SwissStanding],
    match_: &Match,
    config: &SwissConfig,
) -> Result<(), BracketError> {
    if match_.status != MatchStatus::Completed {
        return Err(BracketError::invariant(format!(
            "match {} has no result to apply",
            match_.id
        )));
    }

    match (&match_.slot_1.participant, &match_.slot_2.participant) {
        (Some(a), Some(b)) => match &match_.winner_id {
            Some(winner) => {
                let loser = if winner == a { b } else { a };
                let record = standing_mut(standings, winner)?;
                record.wins += 1;
                add_points(record, config.points_for_win)?;
                record.opponents_faced.insert(loser.clone());

                let record = standing_mut(standings, loser)?;
                record.losses += 1;
                add_points(record, config.points_for_loss)?;
                record.opponents_faced.insert(winner.clone());
            }
            None => {
                for (player, opponent) in [(a, b), (b, a)] {
                    let record = standing_mut(standings, player)?;
                    record.draws += 1;
                    add_points(record, config.points_for_draw)?;
                    record.opponents_faced.insert(opponent.clone());
                }
            }
        },
        (Some(advancing), None) | (None, Some(advancing)) => {
            let record = standing_mut(standings, advancing)?;
            record.wins += 1;
            record.byes += 1;
            add_points(record, config.bye_points())?;
        }
        (None, None) => {
            return Err(BracketError::invariant(format!(
                "match {} has no participants",
                match_.id
            )));
        }
    }

    Ok(())
}

/// Ranking by points, then wins, then draws. Equal records keep their order.
pub fn final_standings(standings: &[SwissStanding]) -> Vec<SwissStanding> {
    standings
        .iter()
        .sorted_by(|a, b| (b.points, b.wins, b.draws).cmp(&(a.points, a.wins, a.draws)))
        .cloned()
        .collect()
}

/// Records a played result, then pairs the next round once the current one is done.
pub(crate) fn complete_match(
    bracket: &mut BracketInstance,
    match_id: MatchId,
    winner: Option<MatchParticipant>,
) -> Result<(), BracketError> {
    let match_ = bracket
        .winners_rounds
        .iter_mut()
        .flat_map(|round| round.matches.iter_mut())
        .find(|m| m.id == match_id)
        .ok_or_else(|| BracketError::invariant(format!("swiss match {} not found", match_id)))?;
    match_.status = MatchStatus::Completed;
    match_.winner_id = winner;
    let completed = match_.clone();

    let SwissState { config, standings } = bracket
        .swiss
        .as_mut()
        .ok_or_else(|| BracketError::invariant("swiss bracket without standings"))?;
    apply_result(standings, &completed, config)?;

    start_next_round(bracket)
}

/// Pairs rounds until one needs results or the configured number is reached.
/// Play also stops early once every participant has met every other one.
fn start_next_round(bracket: &mut BracketInstance) -> Result<(), BracketError> {
    loop {
        if !bracket.winners_rounds.last().map_or(true, Round::is_complete) {
            return Ok(());
        }

        let SwissState { config, standings } = bracket
            .swiss
            .as_mut()
            .ok_or_else(|| BracketError::invariant("swiss bracket without standings"))?;

        if bracket.winners_rounds.len() >= config.number_of_rounds as usize {
            bracket.champion_id = crown(standings);
            return Ok(());
        }

        let round = pair_round(standings, &bracket.winners_rounds);
        if round.matches.iter().all(Match::is_bye) {
            info!(
                "no pairings left after {} of {} rounds",
                round.round, config.number_of_rounds
            );
            bracket.champion_id = crown(standings);
            return Ok(());
        }

        for bye in round.matches.iter().filter(|m| m.is_bye()) {
            apply_result(standings, bye, config)?;
        }
        debug!(
            "swiss round {} paired with {} matches",
            round.round,
            round.matches.len()
        );
        bracket.winners_rounds.push(round);
    }
}

fn crown(standings: &[SwissStanding]) -> Option<MatchParticipant> {
    let champion = final_standings(standings)
        .into_iter()
        .next()
        .map(|standing| standing.participant_id);
    if let Some(champion) = &champion {
        info!("swiss rounds complete, {} finishes first", champion);
    }
    champion
}

fn standing_mut<'a>(
    standings: &'a mut [SwissStanding],
    participant: &MatchParticipant,
) -> Result<&'a mut SwissStanding, BracketError> {
    standings
        .iter_mut()
        .find(|s| s.participant_id == *participant)
        .ok_or_else(|| BracketError::invariant(format!("{} has no standing", participant)))
}

fn add_points(record: &mut SwissStanding, points: Uint64) -> Result<(), BracketError> {
    record.points = record
        .points
        .checked_add(Uint128::from(points.u64()))
        .map_err(|e| BracketError::invariant(e.to_string()))?;
    Ok(())
}
