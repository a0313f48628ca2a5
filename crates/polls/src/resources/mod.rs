//! HTTP-facing resources over questions and choices.
//!
//! [`crud`] holds the generic get/filter/create/update/delete operations, the question and
//! choice modules plug their entity rules into it, and [`PollService`] adds the vote
//! operations on top. [`poll_router`] maps the public URLs onto all of it.

pub mod choice;
pub mod crud;
pub mod question;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use choice::ChoiceResource;
pub use crud::Resource;
pub use question::QuestionResource;
pub use request::ResourceRequest;
pub use response::{ResourceError, ResourceResponse, VoteResponse};
pub use router::poll_router;
pub use service::PollService;
