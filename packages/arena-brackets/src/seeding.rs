use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    msg::{validate_roster, SeedingPolicy},
    state::Participant,
    BracketError, ValidationError,
};

/// Orders participants for bracket placement; the first entry is seed #1.
pub fn order(
    participants: &[Participant],
    policy: &SeedingPolicy,
) -> Result<Vec<Participant>, BracketError> {
    validate_roster(participants)?;

    match policy {
        SeedingPolicy::Manual => {
            let mut seeded = Vec::with_capacity(participants.len());
            for participant in participants {
                let seed_number = participant.seed_number.ok_or_else(|| {
                    ValidationError::MissingSeedNumber {
                        id: participant.id.clone(),
                    }
                })?;
                seeded.push((seed_number, participant));
            }
            if let Some(seed_number) = seeded.iter().map(|(seed, _)| *seed).duplicates().next() {
                return Err(ValidationError::DuplicateSeedNumber { seed_number }.into());
            }

            Ok(seeded
                .into_iter()
                .sorted_by_key(|(seed, _)| *seed)
                .map(|(_, participant)| participant.clone())
                .collect())
        }
        SeedingPolicy::Random { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };
            let mut shuffled = participants.to_vec();
            shuffled.shuffle(&mut rng);
            Ok(shuffled)
        }
        // Unscored participants sort below every scored one
        SeedingPolicy::SkillBased => Ok(participants
            .iter()
            .sorted_by(|a, b| b.skill_score.cmp(&a.skill_score))
            .cloned()
            .collect()),
    }
}
