//! One CRUD implementation shared by every resource.
//!
//! A [`Resource`] describes an entity: how to look it up, list it, store it, rename it,
//! remove it, and serialize it, plus the labels used in validation messages. The free
//! functions in this module own the request validation and response shaping, so the
//! question and choice resources only supply the entity-specific parts.

use serde::Serialize;
use tracing::info;

use super::request::ResourceRequest;
use super::response::{ResourceError, ResourceResponse};
use crate::model::domain::has_content;
use crate::store::RepositoryError;

pub trait Resource: Send + Sync {
    type Id: Copy + From<u64> + std::fmt::Display;
    type Entity;
    type View: Serialize;

    /// Entity name used in messages, e.g. `Question`.
    const LABEL: &'static str;
    /// Body field carrying the entity's text.
    const TEXT_FIELD: &'static str;
    const TEXT_LABEL: &'static str;
    const ID_LABEL: &'static str;
    /// Query parameter accepted by [`filter`].
    const FILTER_FIELD: &'static str;

    /// Lookup applying the resource's visibility rules.
    fn lookup(&self, id: Self::Id) -> Result<Option<Self::Entity>, RepositoryError>;

    /// Visible entities, narrowed by the optional case-insensitive substring.
    fn search(&self, needle: Option<&str>) -> Result<Vec<Self::Entity>, RepositoryError>;

    /// Persist a new entity. `text` has already been validated.
    fn insert(&self, text: String, request: &ResourceRequest)
        -> Result<Self::Entity, ResourceError>;

    fn rename(&self, id: Self::Id, text: String) -> Result<Option<Self::Entity>, RepositoryError>;

    fn remove(&self, id: Self::Id) -> Result<bool, RepositoryError>;

    fn serialize(&self, entity: &Self::Entity) -> Self::View;
}

fn required_text<R: Resource>(request: &ResourceRequest) -> Result<String, ResourceError> {
    request
        .text(R::TEXT_FIELD)
        .filter(|text| has_content(text))
        .map(str::to_string)
        .ok_or(ResourceError::MissingField {
            label: R::TEXT_LABEL,
            field: R::TEXT_FIELD,
        })
}

fn required_id<R: Resource>(request: &ResourceRequest) -> Result<R::Id, ResourceError> {
    request
        .pk()
        .map(<R::Id as From<u64>>::from)
        .ok_or(ResourceError::MissingField {
            label: R::ID_LABEL,
            field: "pk",
        })
}

pub fn get_pk<R: Resource>(
    resource: &R,
    request: &ResourceRequest,
) -> Result<ResourceResponse<R::View>, ResourceError> {
    let id = request.pk().ok_or(ResourceError::NotFound(R::LABEL))?;
    let entity = resource
        .lookup(<R::Id as From<u64>>::from(id))?
        .ok_or(ResourceError::NotFound(R::LABEL))?;
    Ok(ResourceResponse::ok(resource.serialize(&entity)))
}

pub fn filter<R: Resource>(
    resource: &R,
    request: &ResourceRequest,
) -> Result<ResourceResponse<Vec<R::View>>, ResourceError> {
    let needle = request.query(R::FILTER_FIELD).filter(|needle| !needle.is_empty());
    let views = resource
        .search(needle)?
        .iter()
        .map(|entity| resource.serialize(entity))
        .collect();
    Ok(ResourceResponse::ok(views))
}

pub fn create<R: Resource>(
    resource: &R,
    request: &ResourceRequest,
) -> Result<ResourceResponse<R::View>, ResourceError> {
    let text = required_text::<R>(request)?;
    let entity = resource.insert(text, request)?;
    let view = resource.serialize(&entity);
    info!(resource = R::LABEL, "created");
    Ok(ResourceResponse::created(
        view,
        format!("{} created successfully.", R::LABEL),
    ))
}

pub fn update<R: Resource>(
    resource: &R,
    request: &ResourceRequest,
) -> Result<ResourceResponse<R::View>, ResourceError> {
    let id = required_id::<R>(request)?;
    let text = required_text::<R>(request)?;
    let entity = resource
        .rename(id, text)?
        .ok_or(ResourceError::NotFound(R::LABEL))?;
    info!(resource = R::LABEL, %id, "updated");
    Ok(ResourceResponse::ok(resource.serialize(&entity))
        .with_message(format!("{} updated successfully.", R::LABEL)))
}

pub fn delete<R: Resource>(
    resource: &R,
    request: &ResourceRequest,
) -> Result<ResourceResponse<()>, ResourceError> {
    let id = required_id::<R>(request)?;
    if !resource.remove(id)? {
        return Err(ResourceError::NotFound(R::LABEL));
    }
    info!(resource = R::LABEL, %id, "deleted");
    Ok(ResourceResponse::confirmed(format!(
        "{} deleted successfully!",
        R::LABEL
    )))
}
