//! Domain Models
//!
//! Smartsheet payloads. Only the fields the tools read are modelled; the rest
//! is kept in `extra` so the gateway passes responses through unmodified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entry of `GET /sheets`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    pub id: i64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Paged envelope returned by `GET /sheets`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetList {
    #[serde(default)]
    pub page_number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub total_count: u32,

    #[serde(default)]
    pub data: Vec<SheetSummary>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: i64,

    #[serde(default)]
    pub index: u32,

    pub title: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub column_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Display text, falling back to the raw value
    pub fn text(&self) -> Option<String> {
        if let Some(display) = &self.display_value {
            return Some(display.clone());
        }
        match self.value.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: i64,

    #[serde(default)]
    pub row_number: u32,

    #[serde(default)]
    pub cells: Vec<Cell>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A sheet with its columns and rows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: i64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,

    #[serde(default)]
    pub total_row_count: u32,

    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub rows: Vec<Row>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sheet {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            permalink: None,
            total_row_count: 0,
            columns: Vec::new(),
            rows: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Column titles in sheet order
    pub fn column_titles(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.title.as_str()).collect()
    }

    /// Rows as `{column title: cell text}` records, at most `limit` of them
    ///
    /// Empty cells are left out.
    pub fn records(&self, limit: usize) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                row.cells
                    .iter()
                    .filter_map(|cell| {
                        let column = self.columns.iter().find(|c| c.id == cell.column_id)?;
                        Some((column.title.clone(), Value::String(cell.text()?)))
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_sheet() -> Value {
        json!({
            "id": 4583173393803140_i64,
            "name": "Website Launch",
            "totalRowCount": 1,
            "version": 7,
            "columns": [
                {"id": 11, "index": 0, "title": "Task", "type": "TEXT_NUMBER", "primary": true},
                {"id": 12, "index": 1, "title": "Done", "type": "CHECKBOX"}
            ],
            "rows": [
                {"id": 21, "rowNumber": 1, "cells": [
                    {"columnId": 11, "value": "Design", "displayValue": "Design"},
                    {"columnId": 12, "value": true},
                    {"columnId": 99, "value": "orphan"}
                ]}
            ]
        })
    }

    #[test]
    fn test_sheet_passes_through() {
        let raw = raw_sheet();
        let sheet: Sheet = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(sheet.extra["version"], 7);
        assert_eq!(serde_json::to_value(&sheet).unwrap(), raw);
    }

    #[test]
    fn test_records_use_column_titles() {
        let sheet: Sheet = serde_json::from_value(raw_sheet()).unwrap();
        let records = sheet.records(10);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Task"], "Design");
        assert_eq!(records[0]["Done"], "true");
        assert_eq!(records[0].len(), 2);
        assert_eq!(sheet.column_titles(), ["Task", "Done"]);
    }

    #[test]
    fn test_sheet_list_envelope() {
        let list: SheetList = serde_json::from_value(json!({
            "pageNumber": 1,
            "totalPages": 1,
            "totalCount": 1,
            "data": [{"id": 1, "name": "Plan", "accessLevel": "OWNER",
                      "createdAt": "2024-03-01T09:30:00Z"}]
        }))
        .unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.data[0].access_level.as_deref(), Some("OWNER"));
        assert!(list.data[0].created_at.is_some());
    }
}
