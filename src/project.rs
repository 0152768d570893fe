// Copyright 2026 Sage Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Splits a raw search response into metadata, rows, and display columns.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::model::DataRecord;
use crate::model::Metadata;
use crate::model::SearchResponse;

/// Always the first column, whether or not the first row carries it.
pub const PINNED_COLUMN: &str = "MsgId";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Projection {
    pub metadata: Option<Metadata>,
    pub rows: Vec<DataRecord>,
    pub columns: Vec<String>,
}

impl Projection {
    /// The "no results" state shared by empty responses and every failure path.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.rows.is_empty()
    }

    pub fn cell(row: &DataRecord, column: &str) -> String {
        match row.get(column) {
            Some(value) => display_value(value),
            None => "undefined".to_string(),
        }
    }
}

pub fn project(response: SearchResponse) -> Projection {
    let mut items = response.into_iter();
    let Some(first) = items.next() else {
        return Projection::empty();
    };
    let Some(metadata) = metadata_of(&first) else {
        debug!("first response element has no metadata shape");
        return Projection::empty();
    };

    let rows: Vec<DataRecord> = items
        .enumerate()
        .filter_map(|(idx, item)| match item {
            Value::Object(map) => Some(map),
            other => {
                debug!(index = idx + 1, kind = ?other, "dropping non-object row");
                None
            }
        })
        .collect();
    let columns = rows.first().map(display_columns).unwrap_or_default();

    Projection {
        metadata: Some(metadata),
        rows,
        columns,
    }
}

/// Accepts `{"meta": {...}}` as the backend sends it, or a bare metadata object.
fn metadata_of(value: &Value) -> Option<Metadata> {
    let obj = value.as_object()?;
    let candidate = obj.get("meta").unwrap_or(value);
    serde_json::from_value(candidate.clone()).ok()
}

pub fn display_columns(first: &DataRecord) -> Vec<String> {
    std::iter::once(PINNED_COLUMN.to_string())
        .chain(
            first
                .keys()
                .filter(|key| key.as_str() != PINNED_COLUMN)
                .cloned(),
        )
        .collect()
}

/// Mirrors how a browser stringifies a JSON value into a table cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
