use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a question by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

/// Identifier assigned to a choice by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(pub u64);

impl From<u64> for QuestionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for ChoiceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A poll question together with the choices it owns, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub choices: Vec<Choice>,
}

impl Question {
    /// Published questions are the only ones the public listing and detail views expose.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }

    pub fn choice(&self, id: ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: ChoiceId,
    pub question_id: QuestionId,
    pub choice_text: String,
    pub votes: u32,
}

impl Choice {
    /// Add one vote. Returns `None` and leaves the tally untouched when the counter is full.
    pub fn record_vote(&mut self) -> Option<u32> {
        let votes = self.votes.checked_add(1)?;
        self.votes = votes;
        Some(votes)
    }

    /// Remove one vote. Returns `None` and leaves the tally untouched when it is already zero.
    pub fn retract_vote(&mut self) -> Option<u32> {
        let votes = self.votes.checked_sub(1)?;
        self.votes = votes;
        Some(votes)
    }
}

/// Validated input for a new question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

/// Validated input for a new choice. Votes always start at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChoice {
    pub question_id: QuestionId,
    pub choice_text: String,
}

/// Source of "now" for publication checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant; used by the demo and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// True when `text` holds something other than whitespace.
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Case-insensitive substring match used by the `__icontains` filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn choice(votes: u32) -> Choice {
        Choice {
            id: ChoiceId(1),
            question_id: QuestionId(1),
            choice_text: "Red".to_string(),
            votes,
        }
    }

    #[test]
    fn retract_vote_stops_at_zero() {
        let mut choice = choice(1);
        assert_eq!(choice.retract_vote(), Some(0));
        assert_eq!(choice.retract_vote(), None);
        assert_eq!(choice.votes, 0);
    }

    #[test]
    fn record_vote_adds_exactly_one() {
        let mut choice = choice(41);
        assert_eq!(choice.record_vote(), Some(42));
        assert_eq!(choice.votes, 42);
    }

    #[test]
    fn record_vote_refuses_a_full_counter() {
        let mut choice = choice(u32::MAX);
        assert_eq!(choice.record_vote(), None);
        assert_eq!(choice.votes, u32::MAX);
    }

    #[test]
    fn publication_includes_the_current_instant() {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let mut question = Question {
            id: QuestionId(1),
            question_text: "Favorite color?".to_string(),
            pub_date: now,
            choices: Vec::new(),
        };
        assert!(question.is_published(now));

        question.pub_date = now + Duration::seconds(1);
        assert!(!question.is_published(now));
    }

    #[test]
    fn text_helpers() {
        assert!(!has_content("  \t"));
        assert!(has_content(" Red "));
        assert!(contains_ignore_case("What's New?", "new"));
        assert!(!contains_ignore_case("What's up?", "new"));
    }
}
