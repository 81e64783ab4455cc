//! Mock Dog API
//!
//! For testing and demo purposes. Serves a small static breed list and counts
//! every fetch so tests can assert that no upstream call happened.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mcp_core::{numeric_id, AgentError, ResourceProvider, Result};

use super::DogApi;
use crate::model::{DogBreed, DogImage, Measurement};

/// In-memory dog data source
pub struct MockDogApi {
    breeds: Vec<DogBreed>,
    fetches: AtomicUsize,
}

impl Default for MockDogApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDogApi {
    pub fn new() -> Self {
        Self::with_breeds(vec![
            breed(1, "Beagle", "Amiable, Even Tempered, Determined", "Hound", "9 - 11", "33 - 38"),
            breed(2, "Border Collie", "Tenacious, Keen, Energetic", "Herding", "14 - 20", "46 - 56"),
            breed(3, "Pug", "Docile, Clever, Charming", "Toy", "6 - 8", "25 - 30"),
        ])
    }

    pub fn with_breeds(breeds: Vec<DogBreed>) -> Self {
        Self {
            breeds,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
    }

    fn image_for(breed: &DogBreed) -> DogImage {
        DogImage {
            id: format!("img-{}", breed.id),
            url: format!("https://cdn2.thedogapi.com/images/{}.jpg", breed.id),
            width: Some(800),
            height: Some(600),
            breeds: vec![breed.clone()],
            extra: serde_json::Map::new(),
        }
    }
}

fn breed(id: u32, name: &str, temperament: &str, group: &str, weight: &str, height: &str) -> DogBreed {
    let mut breed = DogBreed::new(id, name);
    breed.temperament = Some(temperament.into());
    breed.breed_group = Some(group.into());
    breed.life_span = Some("12 - 15 years".into());
    breed.weight = Some(Measurement {
        imperial: None,
        metric: Some(weight.into()),
    });
    breed.height = Some(Measurement {
        imperial: None,
        metric: Some(height.into()),
    });
    breed
}

#[async_trait]
impl ResourceProvider for MockDogApi {
    type Collection = Vec<DogBreed>;
    type Item = DogBreed;

    fn name(&self) -> &str {
        "MockDogApi"
    }

    fn has_credentials(&self) -> bool {
        true
    }

    async fn fetch_collection(&self, filter: Option<&str>) -> Result<Vec<DogBreed>> {
        self.record();
        let needle = filter.map(str::to_lowercase);
        Ok(self
            .breeds
            .iter()
            .filter(|b| {
                needle
                    .as_deref()
                    .map_or(true, |n| b.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect())
    }

    async fn fetch_item(&self, id: &str) -> Result<DogBreed> {
        let id = numeric_id(id, "Breed ID")?;
        self.record();
        self.breeds
            .iter()
            .find(|b| b.id.to_string() == id)
            .cloned()
            .ok_or_else(|| AgentError::fetch("dog breed", format!("no breed with id {id}")))
    }
}

#[async_trait]
impl DogApi for MockDogApi {
    async fn random_image(&self) -> Result<DogImage> {
        self.record();
        self.breeds
            .first()
            .map(Self::image_for)
            .ok_or_else(|| AgentError::fetch("random dog", "no breeds loaded"))
    }

    async fn images_by_breed(&self, breed_id: u32) -> Result<Vec<DogImage>> {
        self.record();
        Ok(self
            .breeds
            .iter()
            .filter(|b| b.id == breed_id)
            .map(Self::image_for)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_breeds() {
        let api = MockDogApi::new();

        let all = api.breeds().await.unwrap();
        assert_eq!(all.len(), 3);

        let found = api.fetch_collection(Some("collie")).await.unwrap();
        assert_eq!(found[0].name, "Border Collie");

        assert_eq!(api.fetch_item("3").await.unwrap().name, "Pug");
        assert_eq!(api.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_unknown_breed() {
        let api = MockDogApi::new();
        let err = api.fetch_item("999").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(api.images_by_breed(999).await.unwrap().is_empty());
    }
}
