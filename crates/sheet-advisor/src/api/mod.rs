//! Smartsheet Integration

mod mock;
mod smartsheet;

pub use mock::MockSheetApi;
pub use smartsheet::{SmartsheetClient, SmartsheetConfig};

use async_trait::async_trait;
use mcp_core::{ResourceProvider, Result};

use crate::model::{Sheet, SheetList};

/// Spreadsheet data source
///
/// `fetch_collection` returns the paged sheet list (the filter is ignored by
/// the REST API) and `fetch_item` loads one sheet with columns and rows.
#[async_trait]
pub trait SheetApi: ResourceProvider<Collection = SheetList, Item = Sheet> {
    async fn list_sheets(&self) -> Result<SheetList> {
        self.fetch_collection(None).await
    }

    async fn sheet(&self, sheet_id: &str) -> Result<Sheet> {
        self.fetch_item(sheet_id).await
    }
}
