use serde::{Deserialize, Serialize};

use super::domain::{Choice, ChoiceId, Question, QuestionId};

/// Transport shape of a question, choices nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub question_text: String,
    /// RFC 3339 / ISO-8601 with an explicit `+00:00` offset.
    pub pub_date: String,
    pub choices: Vec<ChoiceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub id: ChoiceId,
    pub choice_text: String,
    pub votes: u32,
}

impl From<&Choice> for ChoiceView {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text.clone(),
            votes: choice.votes,
        }
    }
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text.clone(),
            pub_date: question.pub_date.to_rfc3339(),
            choices: question.choices.iter().map(ChoiceView::from).collect(),
        }
    }
}

/// Outcome of a successful vote on a question's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub question_id: QuestionId,
    pub choice_id: ChoiceId,
    pub votes: u32,
}

/// Tally left after a vote was withdrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub votes: u32,
}
