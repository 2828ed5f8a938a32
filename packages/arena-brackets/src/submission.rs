use log::debug;

use crate::{
    advance,
    msg::MatchResultMsg,
    state::{BracketFormat, BracketInstance, MatchId, MatchScore, MatchStatus},
    swiss, BracketError, StateError, ValidationError,
};

/// Applies one match result and everything it sets in motion.
///
/// The returned snapshot replaces the caller's; on error the caller's bracket
/// is untouched.
pub fn submit_result(
    bracket: &BracketInstance,
    result: MatchResultMsg,
) -> Result<BracketInstance, BracketError> {
    let mut staged = bracket.clone();
    apply(&mut staged, result)?;
    Ok(staged)
}

/// Applies a batch of results in order, all or nothing.
pub fn process_matches(
    bracket: &BracketInstance,
    results: Vec<MatchResultMsg>,
) -> Result<BracketInstance, BracketError> {
    let mut staged = bracket.clone();
    for result in results {
        apply(&mut staged, result)?;
    }
    Ok(staged)
}

fn apply(bracket: &mut BracketInstance, result: MatchResultMsg) -> Result<(), BracketError> {
    if bracket.is_terminal() {
        return Err(StateError::BracketComplete {}.into());
    }

    let match_id = result.match_id;
    let match_ = bracket
        .find_match(match_id)
        .ok_or(ValidationError::MatchNotFound { match_id })?;

    if match_.status != MatchStatus::Pending {
        return Err(StateError::MatchResolved {
            match_id,
            status: match_.status,
        }
        .into());
    }
    if !match_.is_playable() {
        return Err(ValidationError::MatchNotReady { match_id }.into());
    }

    let winner_slot = match &result.winner {
        Some(winner) => {
            if !match_.contains(winner) {
                return Err(ValidationError::WinnerNotInMatch {
                    match_id,
                    winner: winner.clone(),
                }
                .into());
            }
            Some(if match_.slot_1.participant.as_ref() == Some(winner) {
                0
            } else {
                1
            })
        }
        None => {
            if bracket.format != BracketFormat::Swiss {
                return Err(ValidationError::DrawNotAllowed { match_id }.into());
            }
            None
        }
    };

    if let Some(score) = result.score {
        validate_score(match_id, score, winner_slot)?;
        if let Some(match_) = bracket.find_match_mut(match_id) {
            match_.score = Some(score);
        }
    }

    debug!(
        "match {} result: {}",
        match_id,
        result
            .winner
            .as_ref()
            .map_or_else(|| "draw".to_string(), ToString::to_string)
    );

    match bracket.format {
        BracketFormat::Swiss => swiss::complete_match(bracket, match_id, result.winner),
        BracketFormat::SingleElimination { .. } | BracketFormat::DoubleElimination => {
            let winner = result
                .winner
                .ok_or(ValidationError::DrawNotAllowed { match_id })?;
            advance::complete_match(bracket, match_id, winner)
        }
    }
}

/// The winning side must have scored more, a draw needs equal scores.
fn validate_score(
    match_id: MatchId,
    score: MatchScore,
    winner_slot: Option<u8>,
) -> Result<(), BracketError> {
    let agrees = match winner_slot {
        Some(0) => score.slot_1 > score.slot_2,
        Some(_) => score.slot_2 > score.slot_1,
        None => score.slot_1 == score.slot_2,
    };

    if agrees {
        Ok(())
    } else {
        Err(ValidationError::ScoreMismatch {
            match_id,
            slot_1: score.slot_1,
            slot_2: score.slot_2,
        }
        .into())
    }
}
