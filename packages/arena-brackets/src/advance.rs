use log::{debug, info};
use std::collections::VecDeque;

use crate::{
    state::{BracketInstance, BracketType, Match, MatchId, MatchLink, MatchParticipant, MatchStatus},
    BracketError, StateError,
};

/// What leaves a match through one of its links.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Arrival {
    Participant(MatchParticipant),
    Bye,
}

/// Records `winner` on a playable match and carries both participants onward,
/// then resolves any byes this uncovers.
pub(crate) fn complete_match(
    bracket: &mut BracketInstance,
    match_id: MatchId,
    winner: MatchParticipant,
) -> Result<(), BracketError> {
    let mut queue = VecDeque::new();
    finish(bracket, match_id, Some(winner), &mut queue)?;
    resolve_byes(bracket, queue)
}

/// Auto-resolves every queued match that can no longer be played, and keeps
/// going with whatever those resolutions fill in.
///
/// Each match resolves at most once and is queued at most once per slot, so
/// the loop ends after at most `2 * matches` steps.
pub(crate) fn resolve_byes(
    bracket: &mut BracketInstance,
    mut queue: VecDeque<MatchId>,
) -> Result<(), BracketError> {
    let limit = 2 * bracket.match_count() + queue.len();
    let mut steps = 0;

    while let Some(match_id) = queue.pop_front() {
        steps += 1;
        if steps > limit {
            return Err(BracketError::invariant(format!(
                "bye resolution did not settle after {} steps",
                limit
            )));
        }

        let match_ = find(bracket, match_id)?;
        if match_.is_resolved() || !match_.slot_1.is_decided() || !match_.slot_2.is_decided() {
            continue;
        }

        match (
            match_.slot_1.participant.clone(),
            match_.slot_2.participant.clone(),
        ) {
            // Both present, this one is played
            (Some(_), Some(_)) => {}
            (Some(advancing), None) | (None, Some(advancing)) => {
                debug!("match {} resolved as a bye for {}", match_id, advancing);
                finish(bracket, match_id, Some(advancing), &mut queue)?;
            }
            (None, None) => {
                debug!("match {} voided, both slots are byes", match_id);
                finish(bracket, match_id, None, &mut queue)?;
            }
        }
    }

    Ok(())
}

/// Fills the linked slot and queues the receiving match for bye resolution.
pub(crate) fn route(
    bracket: &mut BracketInstance,
    link: MatchLink,
    arrival: Arrival,
    queue: &mut VecDeque<MatchId>,
) -> Result<(), BracketError> {
    let target = bracket.find_match_mut(link.match_id).ok_or_else(|| {
        BracketError::invariant(format!("next match {} not found", link.match_id))
    })?;
    let slot = target.slot_mut(link.slot);

    if slot.is_bye {
        return Err(BracketError::invariant(format!(
            "slot {} was already closed as a bye",
            slot.slot_id
        )));
    }

    match arrival {
        Arrival::Participant(incoming) => {
            if let Some(occupant) = &slot.participant {
                return Err(StateError::SlotOccupied {
                    slot_id: slot.slot_id.clone(),
                    occupant: occupant.clone(),
                    incoming,
                }
                .into());
            }
            slot.participant = Some(incoming);
        }
        Arrival::Bye => {
            if slot.participant.is_some() {
                return Err(BracketError::invariant(format!(
                    "bye routed into occupied slot {}",
                    slot.slot_id
                )));
            }
            slot.is_bye = true;
        }
    }

    queue.push_back(link.match_id);
    Ok(())
}

fn find(bracket: &BracketInstance, match_id: MatchId) -> Result<&Match, BracketError> {
    bracket
        .find_match(match_id)
        .ok_or_else(|| BracketError::invariant(format!("match {} not found", match_id)))
}

/// Closes a match (`winner = None` voids it) and sends its winner and loser,
/// or byes in their place, through the precomputed links.
fn finish(
    bracket: &mut BracketInstance,
    match_id: MatchId,
    winner: Option<MatchParticipant>,
    queue: &mut VecDeque<MatchId>,
) -> Result<(), BracketError> {
    let (bracket_type, next_winner, next_loser, loser, slot_1) = {
        let match_ = bracket
            .find_match_mut(match_id)
            .ok_or_else(|| BracketError::invariant(format!("match {} not found", match_id)))?;

        match_.status = if winner.is_some() {
            MatchStatus::Completed
        } else {
            MatchStatus::Void
        };
        match_.winner_id.clone_from(&winner);

        (
            match_.bracket_type,
            match_.next_match_winner,
            match_.next_match_loser,
            match_.loser_id().cloned(),
            match_.slot_1.participant.clone(),
        )
    };

    if let Some(link) = next_loser {
        let arrival = loser.map_or(Arrival::Bye, Arrival::Participant);
        route(bracket, link, arrival, queue)?;
    }

    match (next_winner, winner) {
        (Some(link), Some(winner)) => route(bracket, link, Arrival::Participant(winner), queue),
        (Some(link), None) => route(bracket, link, Arrival::Bye, queue),
        (None, Some(winner)) => crown(bracket, bracket_type, winner, slot_1),
        (None, None) => {
            if bracket_type == BracketType::ThirdPlace {
                Ok(())
            } else {
                Err(BracketError::invariant(format!(
                    "deciding match {} was voided",
                    match_id
                )))
            }
        }
    }
}

/// A match without a next match decides the tournament, or forces the reset.
fn crown(
    bracket: &mut BracketInstance,
    bracket_type: BracketType,
    winner: MatchParticipant,
    slot_1: Option<MatchParticipant>,
) -> Result<(), BracketError> {
    match bracket_type {
        BracketType::Winners | BracketType::ResetMatch => {
            info!("{} is the tournament champion", winner);
            bracket.champion_id = Some(winner);
        }
        BracketType::GrandFinals => {
            if slot_1.as_ref() == Some(&winner) {
                info!("{} wins grand finals from the winners bracket", winner);
                bracket.champion_id = Some(winner);
            } else {
                create_reset_match(bracket)?;
            }
        }
        BracketType::ThirdPlace => {
            debug!("{} takes third place", winner);
        }
        BracketType::Losers | BracketType::Swiss => {
            return Err(BracketError::invariant(format!(
                "{:?} match has nowhere to send its winner",
                bracket_type
            )));
        }
    }

    Ok(())
}

/// Both grand finalists now carry one loss; they play once more.
fn create_reset_match(bracket: &mut BracketInstance) -> Result<(), BracketError> {
    let grand_finals = bracket
        .grand_finals
        .as_ref()
        .ok_or_else(|| BracketError::invariant("reset requested without grand finals"))?;
    if bracket.reset_match.is_some() {
        return Err(BracketError::invariant("reset match already exists"));
    }

    let mut reset = Match::new(
        bracket.next_match_id(),
        grand_finals.round + 1,
        0,
        BracketType::ResetMatch,
    );
    reset.slot_1.participant.clone_from(&grand_finals.slot_1.participant);
    reset.slot_2.participant.clone_from(&grand_finals.slot_2.participant);

    info!(
        "losers bracket champion took grand finals, reset match {} scheduled",
        reset.id
    );
    bracket.reset_match = Some(reset);
    Ok(())
}
