use clap::Args;
use polls::config::PollsConfig;
use polls::error::AppError;
use polls::model::{ChoiceId, QuestionView};
use polls::resources::{crud, PollService, ResourceError, ResourceRequest};
use polls::store::InMemoryPollStore;
use serde_json::json;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Question to open the poll with
    #[arg(long, default_value = "Favorite color?")]
    pub(crate) question: String,
    /// Choice offered to voters; repeat for more choices
    #[arg(long = "choice", default_values_t = ["Red".to_string(), "Green".to_string(), "Blue".to_string()])]
    pub(crate) choices: Vec<String>,
    /// Cast a vote for the Nth choice (1-based); repeat for more ballots
    #[arg(long = "ballot", default_values_t = [1, 1, 2])]
    pub(crate) ballots: Vec<u64>,
    /// Withdraw a vote from the Nth choice (1-based); repeat as needed
    #[arg(long = "retract")]
    pub(crate) retractions: Vec<u64>,
    /// Print the final question payload as JSON instead of a tally
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = PollService::new(Arc::new(InMemoryPollStore::new()), &PollsConfig::default());
    let results = play_session(&service, &args)?;

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Results payload unavailable: {err}"),
        }
    } else {
        render_results(&results);
    }
    Ok(())
}

/// Open the poll, cast and withdraw the requested votes, and return the final results.
pub(crate) fn play_session(
    service: &PollService<InMemoryPollStore>,
    args: &DemoArgs,
) -> Result<QuestionView, AppError> {
    let request = ResourceRequest::new().with_json(object(json!({
        "question_text": args.question,
    })));
    let question = crud::create(service.questions(), &request)?
        .data
        .ok_or(ResourceError::NotFound("Question"))?;
    println!("Opened poll #{}: {}", question.id, question.question_text);

    let mut choice_ids = Vec::with_capacity(args.choices.len());
    for text in &args.choices {
        let request = ResourceRequest::new()
            .with_parent(question.id.0)
            .with_json(object(json!({ "choice_text": text })));
        let choice = crud::create(service.choices(), &request)?
            .data
            .ok_or(ResourceError::NotFound("Choice"))?;
        choice_ids.push(choice.id);
    }

    for ballot in &args.ballots {
        let choice_id = nth_choice(&choice_ids, *ballot);
        match service.vote(question.id, choice_id) {
            Ok(receipt) => println!("- ballot for #{ballot}: {} votes", receipt.votes),
            Err(err) => println!("- ballot for #{ballot} rejected: {err}"),
        }
    }

    for retraction in &args.retractions {
        let Some(choice_id) = nth_choice(&choice_ids, *retraction) else {
            println!("- retraction for #{retraction} rejected: no such choice");
            continue;
        };
        match service.minus_vote(choice_id) {
            Ok(tally) => println!("- retraction for #{retraction}: {} votes", tally.votes),
            Err(err) => println!("- retraction for #{retraction} rejected: {err}"),
        }
    }

    let request = ResourceRequest::new().with_pk(question.id.0);
    let results = crud::get_pk(service.questions(), &request)?
        .data
        .ok_or(ResourceError::NotFound("Question"))?;
    Ok(results)
}

fn nth_choice(choice_ids: &[ChoiceId], position: u64) -> Option<ChoiceId> {
    let index = usize::try_from(position).ok()?.checked_sub(1)?;
    choice_ids.get(index).copied()
}

fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

fn render_results(results: &QuestionView) {
    let total: u32 = results.choices.iter().map(|choice| choice.votes).sum();
    println!("\nResults for \"{}\" ({total} votes)", results.question_text);
    for choice in &results.choices {
        let share = if total == 0 {
            0.0
        } else {
            f64::from(choice.votes) / f64::from(total) * 100.0
        };
        println!("- {}: {} ({share:.0}%)", choice.choice_text, choice.votes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(ballots: Vec<u64>, retractions: Vec<u64>) -> DemoArgs {
        DemoArgs {
            question: "Favorite color?".to_string(),
            choices: vec!["Red".to_string(), "Blue".to_string()],
            ballots,
            retractions,
            json: false,
        }
    }

    #[test]
    fn session_tallies_ballots_and_retractions() {
        let service =
            PollService::new(Arc::new(InMemoryPollStore::new()), &PollsConfig::default());
        let results = play_session(&service, &args(vec![1, 1, 2], vec![1])).expect("session runs");

        let tally: Vec<_> = results
            .choices
            .iter()
            .map(|choice| (choice.choice_text.as_str(), choice.votes))
            .collect();
        assert_eq!(tally, [("Red", 1), ("Blue", 1)]);
    }

    #[test]
    fn out_of_range_ballots_and_floor_retractions_are_skipped() {
        let service =
            PollService::new(Arc::new(InMemoryPollStore::new()), &PollsConfig::default());
        let results = play_session(&service, &args(vec![0, 9], vec![2, 2])).expect("session runs");

        assert!(results.choices.iter().all(|choice| choice.votes == 0));
    }
}
