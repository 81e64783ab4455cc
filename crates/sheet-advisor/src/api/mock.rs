//! Mock Smartsheet API
//!
//! Serves sheets from memory and counts fetches.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mcp_core::{numeric_id, AgentError, ResourceProvider, Result};
use serde_json::{Map, Value};

use super::SheetApi;
use crate::model::{Cell, Column, Row, Sheet, SheetList, SheetSummary};

/// Sample project sheet served by `MockSheetApi::new`
const SAMPLE_PROJECT_ID: i64 = 1001;

/// ID of the sample sheet without rows
const SAMPLE_EMPTY_ID: i64 = 2002;

/// In-memory sheet source
pub struct MockSheetApi {
    sheets: Vec<Sheet>,
    fetches: AtomicUsize,
}

impl Default for MockSheetApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSheetApi {
    /// A project plan plus an empty sheet
    pub fn new() -> Self {
        Self::with_sheets(vec![
            project_sheet(),
            Sheet::new(SAMPLE_EMPTY_ID, "Empty Plan"),
        ])
    }

    pub fn with_sheets(sheets: Vec<Sheet>) -> Self {
        Self {
            sheets,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn column(id: i64, index: u32, title: &str) -> Column {
    Column {
        id,
        index,
        title: title.into(),
        column_type: Some("TEXT_NUMBER".into()),
        primary: (index == 0).then_some(true),
        extra: Map::new(),
    }
}

fn row(id: i64, row_number: u32, values: &[&str]) -> Row {
    Row {
        id,
        row_number,
        cells: values
            .iter()
            .zip(1..)
            .map(|(value, column_id)| Cell {
                column_id,
                value: Some(Value::String((*value).into())),
                display_value: Some((*value).into()),
                extra: Map::new(),
            })
            .collect(),
        extra: Map::new(),
    }
}

fn project_sheet() -> Sheet {
    let mut sheet = Sheet::new(SAMPLE_PROJECT_ID, "Website Launch");
    sheet.columns = vec![
        column(1, 0, "Task"),
        column(2, 1, "Owner"),
        column(3, 2, "Status"),
        column(4, 3, "Due Date"),
    ];
    sheet.rows = vec![
        row(11, 1, &["Design mockups", "Ana", "Complete", "2024-03-01"]),
        row(12, 2, &["Build frontend", "Ben", "In Progress", "2024-04-15"]),
        row(13, 3, &["Load testing", "", "Not Started", "2024-05-01"]),
    ];
    sheet.total_row_count = 3;
    sheet
}

#[async_trait]
impl ResourceProvider for MockSheetApi {
    type Collection = SheetList;
    type Item = Sheet;

    fn name(&self) -> &str {
        "MockSheetApi"
    }

    fn has_credentials(&self) -> bool {
        true
    }

    async fn fetch_collection(&self, _filter: Option<&str>) -> Result<SheetList> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let data: Vec<SheetSummary> = self
            .sheets
            .iter()
            .map(|s| SheetSummary {
                id: s.id,
                name: s.name.clone(),
                access_level: Some("OWNER".into()),
                permalink: s.permalink.clone(),
                created_at: None,
                modified_at: None,
                extra: Map::new(),
            })
            .collect();
        let count = u32::try_from(data.len()).unwrap_or(u32::MAX);
        Ok(SheetList {
            page_number: 1,
            page_size: None,
            total_pages: 1,
            total_count: count,
            data,
            extra: Map::new(),
        })
    }

    async fn fetch_item(&self, id: &str) -> Result<Sheet> {
        let id = numeric_id(id, "Sheet ID")?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.sheets
            .iter()
            .find(|s| s.id.to_string() == id)
            .cloned()
            .ok_or_else(|| {
                AgentError::fetch("sheet", format!("Smartsheet answered 404: no sheet {id}"))
            })
    }
}

impl SheetApi for MockSheetApi {}
