use std::sync::Arc;

use tracing::{debug, info};

use super::choice::ChoiceResource;
use super::question::QuestionResource;
use super::response::ResourceError;
use crate::config::PollsConfig;
use crate::model::{
    Choice, ChoiceId, ChoiceView, Clock, QuestionId, SystemClock, VoteReceipt, VoteTally,
};
use crate::store::PollRepository;

/// Service composing the question and choice resources with the vote operations.
pub struct PollService<R> {
    store: Arc<R>,
    questions: QuestionResource<R>,
    choices: ChoiceResource<R>,
}

impl<R> PollService<R>
where
    R: PollRepository + 'static,
{
    pub fn new(store: Arc<R>, config: &PollsConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<R>, config: &PollsConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            questions: QuestionResource::new(store.clone(), clock, config.latest_limit),
            choices: ChoiceResource::new(store.clone()),
            store,
        }
    }

    pub fn questions(&self) -> &QuestionResource<R> {
        &self.questions
    }

    pub fn choices(&self) -> &ChoiceResource<R> {
        &self.choices
    }

    /// Count one vote for `choice_id`, which must belong to `question_id`.
    ///
    /// The question does not need to be published. A missing choice id is reported the
    /// same way as a choice from another question.
    pub fn vote(
        &self,
        question_id: QuestionId,
        choice_id: Option<ChoiceId>,
    ) -> Result<VoteReceipt, ResourceError> {
        let question = self
            .store
            .question(question_id)?
            .ok_or(ResourceError::NotFound("Question"))?;

        let choice_id = choice_id
            .filter(|id| question.choice(*id).is_some())
            .ok_or(ResourceError::InvalidChoice)?;

        // The choice may have been deleted between the two store calls.
        let votes = self
            .store
            .update_choice(choice_id, |choice| {
                (choice.question_id == question_id).then(|| choice.record_vote())
            })?
            .flatten()
            .ok_or(ResourceError::InvalidChoice)?
            .ok_or(ResourceError::VoteCeiling)?;

        info!(%question_id, %choice_id, votes, "vote recorded");
        Ok(VoteReceipt {
            question_id,
            choice_id,
            votes,
        })
    }

    /// Withdraw one vote. At zero nothing changes and [`ResourceError::VoteFloor`] is returned.
    pub fn minus_vote(&self, choice_id: ChoiceId) -> Result<VoteTally, ResourceError> {
        let votes = self
            .store
            .update_choice(choice_id, Choice::retract_vote)?
            .ok_or(ResourceError::NotFound("Choice"))?;

        match votes {
            Some(votes) => {
                info!(%choice_id, votes, "vote withdrawn");
                Ok(VoteTally { votes })
            }
            None => {
                debug!(%choice_id, "vote withdrawal refused at zero");
                Err(ResourceError::VoteFloor)
            }
        }
    }

    /// Count one vote addressed only by choice id.
    pub fn vote_for_choice(&self, choice_id: Option<ChoiceId>) -> Result<ChoiceView, ResourceError> {
        let choice_id = choice_id.ok_or(ResourceError::MissingField {
            label: "Choice ID",
            field: "choice_id",
        })?;

        let choice = self
            .store
            .update_choice(choice_id, |choice| {
                choice
                    .record_vote()
                    .map(|_| ChoiceView::from(&*choice))
            })?
            .ok_or(ResourceError::UnknownReference("Choice"))?
            .ok_or(ResourceError::VoteCeiling)?;

        info!(%choice_id, votes = choice.votes, "vote recorded");
        Ok(choice)
    }
}
