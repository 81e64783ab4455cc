//! Domain Models
//!
//! TheDogAPI payloads. Fields the gateway does not read are kept in `extra`
//! so responses pass through unmodified.

use serde::{Deserialize, Serialize};

/// Imperial/metric measurement pair, e.g. weight or height ranges
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imperial: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

/// A dog breed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DogBreed {
    pub id: u32,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperament: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_span: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measurement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Measurement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bred_for: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_id: Option<String>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DogBreed {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            temperament: None,
            life_span: None,
            weight: None,
            height: None,
            bred_for: None,
            breed_group: None,
            origin: None,
            reference_image_id: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// A dog image
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DogImage {
    pub id: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breeds: Vec<DogBreed>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Compact breed view embedded in breed-matching prompts
#[derive(Clone, Debug, Serialize)]
pub struct BreedSummary<'a> {
    pub name: &'a str,
    pub temperament: Option<&'a str>,
    pub bred_for: Option<&'a str>,
    pub breed_group: Option<&'a str>,
    pub life_span: Option<&'a str>,
    pub weight: Option<&'a str>,
    pub height: Option<&'a str>,
}

impl<'a> From<&'a DogBreed> for BreedSummary<'a> {
    fn from(breed: &'a DogBreed) -> Self {
        Self {
            name: &breed.name,
            temperament: breed.temperament.as_deref(),
            bred_for: breed.bred_for.as_deref(),
            breed_group: breed.breed_group.as_deref(),
            life_span: breed.life_span.as_deref(),
            weight: breed.weight.as_ref().and_then(|w| w.metric.as_deref()),
            height: breed.height.as_ref().and_then(|h| h.metric.as_deref()),
        }
    }
}
