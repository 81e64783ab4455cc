//! Application State

use std::sync::Arc;

use dog_advisor::DogApi;
use mcp_core::{CompletionProvider, ResourceDescriptor, ResourceProvider, ToolDispatch};
use sheet_advisor::SheetApi;

use crate::config::Domain;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Completion provider (OpenAI, scripted in tests)
    pub provider: Arc<dyn CompletionProvider>,

    /// Dispatcher for the active domain's tools
    pub dispatcher: Arc<dyn ToolDispatch>,

    /// Entries for `GET /mcp/resources`
    pub resources: Arc<Vec<ResourceDescriptor>>,

    pub domain: Domain,

    /// Dog data source (dogs domain only)
    pub dogs: Option<Arc<dyn DogApi>>,

    /// Sheet data source (sheets domain only)
    pub sheets: Option<Arc<dyn SheetApi>>,
}

impl AppState {
    /// State for the dogs domain
    pub fn for_dogs(
        provider: Arc<dyn CompletionProvider>,
        api: Arc<dyn DogApi>,
    ) -> mcp_core::Result<Self> {
        let dispatcher = dog_advisor::dispatcher(api.clone(), provider.clone())?;
        Ok(Self {
            provider,
            dispatcher: Arc::new(dispatcher),
            resources: Arc::new(dog_advisor::resources()),
            domain: Domain::Dogs,
            dogs: Some(api),
            sheets: None,
        })
    }

    /// State for the sheets domain
    pub fn for_sheets(
        provider: Arc<dyn CompletionProvider>,
        api: Arc<dyn SheetApi>,
    ) -> mcp_core::Result<Self> {
        let dispatcher = sheet_advisor::dispatcher(api.clone(), provider.clone())?;
        Ok(Self {
            provider,
            dispatcher: Arc::new(dispatcher),
            resources: Arc::new(sheet_advisor::resources()),
            domain: Domain::Sheets,
            dogs: None,
            sheets: Some(api),
        })
    }

    /// Whether the active domain's data source has an API key
    pub fn data_source_authenticated(&self) -> bool {
        match (&self.dogs, &self.sheets) {
            (Some(dogs), _) => dogs.has_credentials(),
            (None, Some(sheets)) => sheets.has_credentials(),
            (None, None) => false,
        }
    }
}
