use crate::{
    state::{BracketFormat, BracketInstance, Match, MatchId, MatchParticipant},
    swiss::final_standings,
    BracketError, ValidationError,
};

pub fn query_match(bracket: &BracketInstance, match_id: MatchId) -> Result<&Match, BracketError> {
    bracket
        .find_match(match_id)
        .ok_or_else(|| ValidationError::MatchNotFound { match_id }.into())
}

/// Matches ordered by id, starting after `start_after` when given.
pub fn query_bracket(bracket: &BracketInstance, start_after: Option<MatchId>) -> Vec<&Match> {
    let mut matches: Vec<&Match> = bracket
        .matches()
        .filter(|m| start_after.map_or(true, |after| m.id > after))
        .collect();
    matches.sort_by_key(|m| m.id);
    matches
}

/// Final placements, best first. Empty until the bracket is terminal.
///
/// Single elimination yields 1st and 2nd, plus 3rd and 4th when the third place
/// match was played. Double elimination yields 1st, 2nd and the losers final
/// loser as 3rd. Swiss yields the whole final standings.
pub fn placements(bracket: &BracketInstance) -> Vec<MatchParticipant> {
    if !bracket.is_terminal() {
        return vec![];
    }

    let mut placements = vec![];

    match &bracket.format {
        BracketFormat::SingleElimination { .. } => {
            if let Some(final_match) = bracket
                .winners_rounds
                .last()
                .and_then(|round| round.matches.first())
            {
                push_result(&mut placements, final_match);
            }
            if let Some(third_place) = &bracket.third_place_match {
                push_result(&mut placements, third_place);
            }
        }
        BracketFormat::DoubleElimination => {
            if let Some(final_match) = bracket.reset_match.as_ref().or(bracket.grand_finals.as_ref()) {
                push_result(&mut placements, final_match);
            }
            if let Some(third_place) = bracket
                .losers_rounds
                .last()
                .and_then(|round| round.matches.first())
                .and_then(Match::loser_id)
            {
                placements.push(third_place.clone());
            }
        }
        BracketFormat::Swiss => {
            if let Some(swiss) = &bracket.swiss {
                placements.extend(
                    final_standings(&swiss.standings)
                        .into_iter()
                        .map(|standing| standing.participant_id),
                );
            }
        }
    }

    placements
}

fn push_result(placements: &mut Vec<MatchParticipant>, match_: &Match) {
    if let Some(winner) = &match_.winner_id {
        placements.push(winner.clone());
    }
    if let Some(loser) = match_.loser_id() {
        placements.push(loser.clone());
    }
}
