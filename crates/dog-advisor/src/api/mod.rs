//! TheDogAPI Integration
//!
//! Client abstraction plus the HTTP and in-memory implementations.

mod mock;
mod thedogapi;

pub use mock::MockDogApi;
pub use thedogapi::{DogApiConfig, TheDogApiClient};

use async_trait::async_trait;
use mcp_core::{ResourceProvider, Result};

use crate::model::{DogBreed, DogImage};

/// Dog data source (Strategy pattern)
///
/// `fetch_collection` lists breeds (a filter searches by name) and
/// `fetch_item` loads one breed by ID.
#[async_trait]
pub trait DogApi: ResourceProvider<Collection = Vec<DogBreed>, Item = DogBreed> {
    /// One random dog image
    async fn random_image(&self) -> Result<DogImage>;

    /// Up to ten images of a breed
    async fn images_by_breed(&self, breed_id: u32) -> Result<Vec<DogImage>>;

    /// All breeds
    async fn breeds(&self) -> Result<Vec<DogBreed>> {
        self.fetch_collection(None).await
    }
}
