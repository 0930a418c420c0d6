//! REST API Bindings
//!
//! Typed access to the backend `/items` resource.

mod error;
mod items;

use async_trait::async_trait;

use crate::models::{Item, ItemPage, ItemPatch, ItemPayload};

pub use error::{ApiError, ApiResult};
pub use items::{ItemClient, ListQuery};

/// Operations the list controller needs from the backend
///
/// Implemented over HTTP by [`ItemClient`]; tests drive the controller
/// with scripted implementations.
#[async_trait(?Send)]
pub trait ItemApi: Send + Sync {
    /// Fetch one page of items matching the query
    async fn list(&self, query: &ListQuery) -> ApiResult<ItemPage>;

    /// Create a new item
    async fn create(&self, payload: &ItemPayload) -> ApiResult<Item>;

    /// Apply a partial update to an existing item
    async fn update(&self, id: &str, patch: &ItemPatch) -> ApiResult<Item>;

    /// Delete an item; a missing id is reported as [`ApiError::NotFound`]
    async fn delete(&self, id: &str) -> ApiResult<()>;
}
