//! Question and choice entities plus their transport views.

pub mod domain;
pub mod views;

pub use domain::{
    Choice, ChoiceId, Clock, FixedClock, NewChoice, NewQuestion, Question, QuestionId,
    SystemClock,
};
pub use views::{ChoiceView, QuestionView, VoteReceipt, VoteTally};
