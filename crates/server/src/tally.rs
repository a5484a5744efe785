//! Vote tallying.
//!
//! An action's outcome is a pure function of its current ballots:
//! `score` is the sum of the values, `total_votes` counts every ballot
//! (neutral ones included) and the action is approved only when the score
//! is strictly positive. Ties and empty ballot sets are not approved.

use serde::{Deserialize, Serialize};

use crate::models::{Action, DecisionOutcome, Vote};

/// A single ballot. Serialized as the bare integer `-1`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteValue {
    Down,
    Neutral,
    Up,
}

impl VoteValue {
    pub fn as_i64(self) -> i64 {
        match self {
            VoteValue::Down => -1,
            VoteValue::Neutral => 0,
            VoteValue::Up => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("vote value must be -1, 0 or 1, got {0}")]
pub struct InvalidVoteValue(pub i64);

impl TryFrom<i64> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(VoteValue::Down),
            0 => Ok(VoteValue::Neutral),
            1 => Ok(VoteValue::Up),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i64 {
    fn from(value: VoteValue) -> Self {
        value.as_i64()
    }
}

/// Three-way reading of the score, kept next to the boolean verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Approved,
    Rejected,
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub score: i64,
    pub total_votes: u64,
}

impl Tally {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = VoteValue>,
    {
        values.into_iter().fold(Tally::default(), |acc, value| Tally {
            score: acc.score + value.as_i64(),
            total_votes: acc.total_votes + 1,
        })
    }

    pub fn from_votes<'a, I>(votes: I) -> Self
    where
        I: IntoIterator<Item = &'a Vote>,
    {
        Self::from_values(votes.into_iter().map(|vote| vote.value))
    }

    pub fn is_approved(&self) -> bool {
        self.score > 0
    }

    pub fn outcome(&self) -> Outcome {
        match self.score {
            s if s > 0 => Outcome::Approved,
            s if s < 0 => Outcome::Rejected,
            _ => Outcome::Neutral,
        }
    }
}

/// Builds the decision view for `action` from the votes it has right now.
pub fn decide(action: &Action, votes: Vec<Vote>) -> DecisionOutcome {
    let tally = Tally::from_votes(&votes);

    DecisionOutcome {
        action_id: action.id,
        action_type: action.action_type.clone(),
        content: action.content.clone(),
        is_approved: tally.is_approved(),
        outcome: tally.outcome(),
        total_votes: tally.total_votes,
        score: tally.score,
        votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn ballots(values: &[i64]) -> Vec<Vote> {
        let action_id = Uuid::new_v4();
        values
            .iter()
            .map(|v| Vote {
                action_id,
                user_id: Uuid::new_v4(),
                value: VoteValue::try_from(*v).unwrap(),
                cast_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn majority_up_is_approved() {
        let tally = Tally::from_votes(&ballots(&[1, 1, -1]));
        assert_eq!(tally.score, 1);
        assert_eq!(tally.total_votes, 3);
        assert!(tally.is_approved());
        assert_eq!(tally.outcome(), Outcome::Approved);
    }

    #[test]
    fn down_and_neutral_is_rejected() {
        let tally = Tally::from_votes(&ballots(&[-1, 0]));
        assert_eq!(tally.score, -1);
        assert_eq!(tally.total_votes, 2);
        assert!(!tally.is_approved());
        assert_eq!(tally.outcome(), Outcome::Rejected);
    }

    #[test]
    fn no_votes_is_not_approved() {
        let tally = Tally::from_votes(&Vec::<Vote>::new());
        assert_eq!(tally, Tally { score: 0, total_votes: 0 });
        assert!(!tally.is_approved());
        assert_eq!(tally.outcome(), Outcome::Neutral);
    }

    #[test]
    fn tie_is_not_approved() {
        let tally = Tally::from_votes(&ballots(&[1, -1, 0, 0]));
        assert_eq!(tally.score, 0);
        assert_eq!(tally.total_votes, 4);
        assert!(!tally.is_approved());
    }

    #[test]
    fn score_is_the_sum_of_values() {
        let sets: [&[i64]; 5] = [&[1; 7], &[-1; 4], &[0, 0, 0], &[1, -1, 1, -1, 1], &[-1, -1, 1]];
        for set in sets {
            let tally = Tally::from_votes(&ballots(set));
            assert_eq!(tally.score, set.iter().sum::<i64>());
            assert_eq!(tally.total_votes, set.len() as u64);
            assert_eq!(tally.is_approved(), tally.score > 0);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(VoteValue::try_from(2_i64), Err(InvalidVoteValue(2)));
        assert_eq!(VoteValue::try_from(-5_i64), Err(InvalidVoteValue(-5)));
        assert!(serde_json::from_str::<VoteValue>("3").is_err());
        assert_eq!(serde_json::from_str::<VoteValue>("-1").unwrap(), VoteValue::Down);
        assert_eq!(serde_json::to_string(&VoteValue::Up).unwrap(), "1");
    }

    #[test]
    fn decide_carries_action_fields_and_votes() {
        let action = Action {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            element_id: None,
            action_type: "proposal".into(),
            content: "Plant more trees".into(),
            linked_elements: vec![],
            created_at: Utc::now(),
        };
        let decision = decide(&action, ballots(&[1, 0]));
        assert_eq!(decision.action_id, action.id);
        assert_eq!(decision.action_type, "proposal");
        assert_eq!(decision.score, 1);
        assert_eq!(decision.total_votes, 2);
        assert_eq!(decision.votes.len(), 2);
        assert!(decision.is_approved);
    }
}
