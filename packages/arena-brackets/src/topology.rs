use cosmwasm_schema::cw_serde;

use crate::{BracketError, ValidationError};

/// Shape of an elimination bracket, derived from the participant count alone.
#[cw_serde]
pub struct BracketTopology {
    pub participants: usize,
    pub rounds: usize,
    pub perfect_size: usize,
    pub byes: usize,
    pub matches_per_round: Vec<usize>,
    /// Empty unless computed for double elimination
    pub losers_matches_per_round: Vec<usize>,
}

impl BracketTopology {
    pub fn compute(participant_count: usize) -> Result<Self, BracketError> {
        if participant_count < 2 {
            return Err(ValidationError::TooFewParticipants {
                count: participant_count,
            }
            .into());
        }

        let perfect_size = participant_count.next_power_of_two();
        let rounds = perfect_size.trailing_zeros() as usize;
        let matches_per_round = (1..=rounds).map(|r| perfect_size >> r).collect();

        Ok(Self {
            participants: participant_count,
            rounds,
            perfect_size,
            byes: perfect_size - participant_count,
            matches_per_round,
            losers_matches_per_round: vec![],
        })
    }

    /// Same as [`BracketTopology::compute`] plus the losers bracket table.
    ///
    /// The losers bracket opens with the winners round 0 losers paired among
    /// themselves, then alternates drop-down rounds (survivors meet the losers
    /// of the next winners round, so the match count holds) with halving rounds.
    /// Two participants produce no losers bracket at all.
    pub fn compute_double(participant_count: usize) -> Result<Self, BracketError> {
        let mut topology = Self::compute(participant_count)?;
        if topology.rounds < 2 {
            return Ok(topology);
        }

        let losers_rounds = 2 * (topology.rounds - 1);
        let mut table: Vec<usize> = Vec::with_capacity(losers_rounds);
        table.push((topology.perfect_size / 4).max(1));
        for i in 1..losers_rounds {
            let previous = table[i - 1];
            table.push(if i % 2 == 1 {
                previous
            } else {
                (previous / 2).max(1)
            });
        }
        // Losers final
        if let Some(last) = table.last_mut() {
            *last = 1;
        }

        topology.losers_matches_per_round = table;
        Ok(topology)
    }

    pub fn first_round_matches(&self) -> usize {
        self.perfect_size / 2
    }

    pub fn losers_rounds(&self) -> usize {
        self.losers_matches_per_round.len()
    }

    /// Losers round that receives the losers of the given winners round.
    pub fn losers_drop_round(&self, winners_round: usize) -> Option<usize> {
        let round = if winners_round == 0 {
            0
        } else {
            2 * winners_round - 1
        };
        (round < self.losers_rounds()).then_some(round)
    }

    /// Winners of losers round `round` at `position` move here as (position, slot).
    ///
    /// Read from the table: a drop-down round keeps the position and puts the
    /// survivor in the first slot, a halving round pairs neighbours.
    pub fn losers_advance(&self, round: usize, position: usize) -> Option<(usize, u8)> {
        let current = *self.losers_matches_per_round.get(round)?;
        let next = *self.losers_matches_per_round.get(round + 1)?;

        if next == current {
            Some((position, 0))
        } else {
            Some((position / 2, (position % 2) as u8))
        }
    }
}

/// Match position for a seed (1-based) among `total_slots` first round matches.
///
/// Seed #1 opens the bracket and seed #2 closes it, odd seeds fill from the top
/// and even seeds from the bottom, so the two best seeds can only meet in the final.
pub fn seed_position(seed: usize, total_slots: usize) -> usize {
    if seed % 2 == 1 {
        seed / 2
    } else {
        total_slots - 1 - (seed - 1) / 2
    }
}

/// (match position, slot) of a seed in round 0.
///
/// The first half of the seeds take slot 1; seed `s` of the second half lands
/// opposite seed `perfect_size + 1 - s`.
pub fn seed_placement(seed: usize, topology: &BracketTopology) -> (usize, u8) {
    let total_slots = topology.first_round_matches();
    let slot = if seed <= total_slots { 0 } else { 1 };
    (seed_position(seed, total_slots), slot)
}
