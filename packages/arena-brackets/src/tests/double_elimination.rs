use crate::{
    create_bracket,
    msg::{MatchResultMsg, SeedingPolicy, TournamentConfig},
    query::{placements, query_match},
    state::{BracketType, MatchLink, MatchParticipant, MatchStatus},
    submit_result, BracketError, StateError,
};

use super::{favourite, losses, play_out, player, roster};

fn config() -> TournamentConfig {
    TournamentConfig::double_elimination(SeedingPolicy::Manual)
}

fn underdog(_: &MatchParticipant, b: &MatchParticipant) -> MatchParticipant {
    b.clone()
}

#[test]
fn test_four_participants_layout() -> Result<(), BracketError> {
    let bracket = create_bracket(&roster(4), &config())?;

    assert_eq!(bracket.match_count(), 6);
    assert_eq!(bracket.winners_rounds.len(), 2);
    assert_eq!(
        bracket
            .losers_rounds
            .iter()
            .map(|r| r.matches.len())
            .collect::<Vec<_>>(),
        vec![1, 1]
    );

    // Both round 0 losers meet in losers round 0
    assert_eq!(
        query_match(&bracket, 1)?.next_match_loser,
        Some(MatchLink::new(4, 0))
    );
    assert_eq!(
        query_match(&bracket, 2)?.next_match_loser,
        Some(MatchLink::new(4, 1))
    );
    // Winners final loser drops into the losers final
    assert_eq!(
        query_match(&bracket, 3)?.next_match_loser,
        Some(MatchLink::new(5, 1))
    );
    assert_eq!(
        query_match(&bracket, 3)?.next_match_winner,
        Some(MatchLink::new(6, 0))
    );
    assert_eq!(
        query_match(&bracket, 5)?.next_match_winner,
        Some(MatchLink::new(6, 1))
    );

    // Global round indices keep increasing through to grand finals
    let rounds = bracket.matches().map(|m| m.round).collect::<Vec<_>>();
    assert_eq!(rounds, vec![0, 0, 1, 2, 3, 4]);
    assert_eq!(
        bracket.grand_finals.as_ref().map(|m| m.bracket_type),
        Some(BracketType::GrandFinals)
    );

    Ok(())
}

#[test]
fn test_winners_bracket_champion_takes_grand_finals() -> Result<(), BracketError> {
    let mut bracket = create_bracket(&roster(4), &config())?;

    bracket = submit_result(&bracket, MatchResultMsg::win(1, player(1)))?;
    bracket = submit_result(&bracket, MatchResultMsg::win(2, player(2)))?;

    let losers_opener = query_match(&bracket, 4)?;
    assert_eq!(losers_opener.slot_1.participant, Some(player(4)));
    assert_eq!(losers_opener.slot_2.participant, Some(player(3)));

    bracket = submit_result(&bracket, MatchResultMsg::win(4, player(3)))?;
    bracket = submit_result(&bracket, MatchResultMsg::win(3, player(1)))?;

    let losers_final = query_match(&bracket, 5)?;
    assert_eq!(losers_final.slot_1.participant, Some(player(3)));
    assert_eq!(losers_final.slot_2.participant, Some(player(2)));

    bracket = submit_result(&bracket, MatchResultMsg::win(5, player(2)))?;
    bracket = submit_result(&bracket, MatchResultMsg::win(6, player(1)))?;

    assert_eq!(bracket.champion_id, Some(player(1)));
    assert!(bracket.reset_match.is_none());
    assert!(bracket.is_terminal());
    assert_eq!(placements(&bracket), vec![player(1), player(2), player(3)]);

    Ok(())
}

#[test]
fn test_reset_match() -> Result<(), BracketError> {
    let mut bracket = create_bracket(&roster(4), &config())?;

    for (match_id, winner) in [(1, 1), (2, 2), (4, 3), (3, 1), (5, 2), (6, 2)] {
        bracket = submit_result(&bracket, MatchResultMsg::win(match_id, player(winner)))?;
    }

    // Losers bracket champion took grand finals, nobody is champion yet
    assert_eq!(bracket.champion_id, None);
    assert!(!bracket.is_terminal());

    let reset = bracket.reset_match.clone().unwrap();
    assert_eq!(reset.id, 7);
    assert_eq!(reset.round, 5);
    assert_eq!(reset.bracket_type, BracketType::ResetMatch);
    assert_eq!(reset.slot_1.participant, Some(player(1)));
    assert_eq!(reset.slot_2.participant, Some(player(2)));
    assert_eq!(bracket.match_count(), 7);

    bracket = submit_result(&bracket, MatchResultMsg::win(7, player(2)))?;

    assert_eq!(bracket.champion_id, Some(player(2)));
    assert!(bracket.is_terminal());
    assert_eq!(placements(&bracket), vec![player(2), player(1), player(3)]);

    assert_eq!(
        submit_result(&bracket, MatchResultMsg::win(7, player(1))),
        Err(BracketError::State(StateError::BracketComplete {}))
    );

    Ok(())
}

#[test]
fn test_eight_participants_drop_into_losers_round_0() -> Result<(), BracketError> {
    let mut bracket = create_bracket(&roster(8), &config())?;

    assert_eq!(bracket.match_count(), 14);
    assert_eq!(
        bracket
            .losers_rounds
            .iter()
            .map(|r| r.matches.len())
            .collect::<Vec<_>>(),
        vec![2, 2, 1, 1]
    );

    for match_id in 1..=4 {
        let match_ = query_match(&bracket, match_id)?;
        let winner = favourite(
            match_.slot_1.participant.as_ref().unwrap(),
            match_.slot_2.participant.as_ref().unwrap(),
        );
        bracket = submit_result(&bracket, MatchResultMsg::win(match_id, winner))?;
    }

    for loser in [8, 6, 5, 7] {
        let appearances = bracket
            .losers_rounds
            .iter()
            .map(|round| {
                round
                    .matches
                    .iter()
                    .filter(|m| m.contains(&player(loser)))
                    .count()
            })
            .collect::<Vec<_>>();
        assert_eq!(appearances, vec![1, 0, 0, 0]);
    }

    let losers_round_0 = &bracket.losers_rounds[0].matches;
    assert_eq!(losers_round_0[0].slot_1.participant, Some(player(8)));
    assert_eq!(losers_round_0[0].slot_2.participant, Some(player(5)));
    assert_eq!(losers_round_0[1].slot_1.participant, Some(player(6)));
    assert_eq!(losers_round_0[1].slot_2.participant, Some(player(7)));

    Ok(())
}

#[test]
fn test_five_participants_losers_byes_cascade() -> Result<(), BracketError> {
    let mut bracket = create_bracket(&roster(5), &config())?;

    // Three winners round 0 byes leave one losers opener empty on both sides
    let voided = query_match(&bracket, 9)?;
    assert_eq!(voided.status, MatchStatus::Void);
    assert_eq!(voided.winner_id, None);

    let waiting = query_match(&bracket, 11)?;
    assert!(waiting.slot_1.is_bye);
    assert_eq!(waiting.status, MatchStatus::Pending);
    assert_eq!(query_match(&bracket, 8)?.status, MatchStatus::Pending);

    bracket = submit_result(&bracket, MatchResultMsg::win(3, player(4)))?;
    // Seed 5 advances through a losers bye straight away
    let opener = query_match(&bracket, 8)?;
    assert!(opener.is_bye());
    assert_eq!(opener.winner_id, Some(player(5)));
    assert_eq!(
        query_match(&bracket, 10)?.slot_1.participant,
        Some(player(5))
    );

    bracket = submit_result(&bracket, MatchResultMsg::win(5, player(1)))?;
    bracket = submit_result(&bracket, MatchResultMsg::win(6, player(2)))?;

    // The winners round 1 loser is carried through the empty losers match
    let carried = query_match(&bracket, 11)?;
    assert!(carried.is_bye());
    assert_eq!(carried.winner_id, Some(player(4)));
    assert_eq!(
        query_match(&bracket, 12)?.slot_2.participant,
        Some(player(4))
    );

    let bracket = play_out(bracket, favourite)?;
    assert!(bracket.is_terminal());
    assert_eq!(bracket.champion_id, Some(player(1)));

    Ok(())
}

#[test]
fn test_every_loser_loses_twice() -> Result<(), BracketError> {
    for n in 2..=33 {
        let bracket = play_out(create_bracket(&roster(n), &config())?, favourite)?;

        assert!(bracket.is_terminal());
        assert_eq!(bracket.champion_id, Some(player(1)));
        assert!(bracket.reset_match.is_none());
        for i in 2..=n {
            assert_eq!(losses(&bracket, &player(i)), 2, "player{} of {}", i, n);
        }
        assert_eq!(losses(&bracket, &player(1)), 0);

        let played = bracket
            .matches()
            .filter(|m| m.status == MatchStatus::Completed && !m.is_bye())
            .count();
        assert_eq!(played, 2 * n - 2);
    }

    Ok(())
}

#[test]
fn test_losers_bracket_champion_through_reset() -> Result<(), BracketError> {
    for n in 2..=20 {
        let bracket = play_out(create_bracket(&roster(n), &config())?, underdog)?;

        assert!(bracket.is_terminal());
        assert!(bracket.reset_match.is_some());

        let champion = bracket.champion_id.clone().unwrap();
        assert_eq!(losses(&bracket, &champion), 1);

        let eliminated = (1..=n).map(player).filter(|p| *p != champion);
        for participant in eliminated {
            assert_eq!(losses(&bracket, &participant), 2);
        }

        let played = bracket
            .matches()
            .filter(|m| m.status == MatchStatus::Completed && !m.is_bye())
            .count();
        assert_eq!(played, 2 * n - 1);
    }

    Ok(())
}

#[test]
fn test_two_participants_skip_losers_bracket() -> Result<(), BracketError> {
    let mut bracket = create_bracket(&roster(2), &config())?;

    assert!(bracket.losers_rounds.is_empty());
    assert_eq!(
        query_match(&bracket, 1)?.next_match_loser,
        Some(MatchLink::new(2, 1))
    );

    bracket = submit_result(&bracket, MatchResultMsg::win(1, player(2)))?;
    let grand_finals = query_match(&bracket, 2)?;
    assert_eq!(grand_finals.slot_1.participant, Some(player(2)));
    assert_eq!(grand_finals.slot_2.participant, Some(player(1)));

    bracket = submit_result(&bracket, MatchResultMsg::win(2, player(2)))?;
    assert_eq!(bracket.champion_id, Some(player(2)));
    assert_eq!(placements(&bracket), vec![player(2), player(1)]);

    Ok(())
}
