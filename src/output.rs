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

//! Terminal and JSON rendering of projections, uploads, and index stats.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::duration::parse_duration;
use crate::model::IndexStats;
use crate::model::Metadata;
use crate::model::UploadOutcome;
use crate::normalize::FIELD_VOCABULARY;
use crate::normalize::normalize;
use crate::project::Projection;
use crate::project::display_value;
use crate::query::RequestDescriptor;

pub const NO_RESULTS: &str = "No results found.";

#[derive(Debug, Clone, Serialize)]
pub struct StatsOut {
    pub total_records: i64,
    pub matched_records: i64,
    pub returned_records: i64,
    pub total_time: Value,
    pub total_seconds: String,
}

impl From<&Metadata> for StatsOut {
    fn from(meta: &Metadata) -> Self {
        Self {
            total_records: meta.total_records,
            matched_records: meta.matched_records,
            returned_records: meta.returned_records,
            total_time: meta.total_time.clone(),
            total_seconds: parse_duration(&meta.total_time),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryOut {
    pub endpoint: String,
    pub text: Option<String>,
    pub filter: Option<Value>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
}

impl From<&RequestDescriptor> for QueryOut {
    fn from(request: &RequestDescriptor) -> Self {
        let (text, filter, sort) = match request {
            RequestDescriptor::FetchAll => (None, None, None),
            RequestDescriptor::SimpleQuery { text, .. } => (Some(text.clone()), None, None),
            RequestDescriptor::StructuredFilter {
                predicate, sort, ..
            } => (
                None,
                Some(Value::Object(predicate.clone())),
                Some(sort.as_backend().to_string()),
            ),
        };
        Self {
            endpoint: request.endpoint().to_string(),
            text,
            filter,
            limit: request.limit(),
            offset: request.skip(),
            sort,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorOut {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct JsonResponse {
    pub ok: bool,
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOut>,
}

impl JsonResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            schema_version: "1".to_string(),
            ..Default::default()
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            ok: false,
            schema_version: "1".to_string(),
            error: Some(ErrorOut {
                code: code.to_string(),
                message: message.to_string(),
            }),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, request: Option<&RequestDescriptor>) -> Self {
        self.query = request.map(QueryOut::from);
        self
    }

    /// Results are emitted unclipped, either as returned or normalized.
    pub fn with_projection(mut self, projection: &Projection, normalized: bool) -> Self {
        self.stats = projection.metadata.as_ref().map(StatsOut::from);
        if normalized {
            self.columns = Some(FIELD_VOCABULARY.iter().map(|s| s.to_string()).collect());
            self.results = Some(
                normalize(&projection.rows)
                    .into_iter()
                    .map(|row| Value::Object(row.to_record()))
                    .collect(),
            );
        } else {
            self.columns = Some(projection.columns.clone());
            self.results = Some(
                projection
                    .rows
                    .iter()
                    .cloned()
                    .map(Value::Object)
                    .collect(),
            );
        }
        self
    }

    pub fn with_upload(mut self, outcome: UploadOutcome) -> Self {
        self.ok = outcome.is_ok();
        self.upload = Some(outcome);
        self
    }

    pub fn with_index(mut self, index: IndexStats) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

pub fn print_json(resp: &JsonResponse) -> Result<()> {
    let text = serde_json::to_string_pretty(resp)?;
    println!("{text}");
    Ok(())
}

pub fn stats_banner(meta: &Metadata) -> String {
    format!(
        "Search Stats: Total Records: {} | Matched Records: {} | Returned Records: {} | Total Time: {} sec",
        meta.total_records,
        meta.matched_records,
        meta.returned_records,
        parse_duration(&meta.total_time)
    )
}

/// Renders the banner (when metadata is present) and the result table.
pub fn render_table(projection: &Projection, normalized: bool, max_cell_width: usize) -> String {
    let mut out = String::new();
    if let Some(meta) = &projection.metadata {
        out.push_str(&stats_banner(meta));
        out.push_str("\n\n");
    }
    if projection.rows.is_empty() {
        out.push_str(NO_RESULTS);
        out.push('\n');
        return out;
    }

    let (columns, rows): (Vec<String>, Vec<Vec<String>>) = if normalized {
        let rows = normalize(&projection.rows)
            .iter()
            .map(|row| row.fields().map(|(_, v)| display_value(v)).collect())
            .collect();
        (FIELD_VOCABULARY.iter().map(|s| s.to_string()).collect(), rows)
    } else {
        let rows = projection
            .rows
            .iter()
            .map(|row| {
                projection
                    .columns
                    .iter()
                    .map(|col| Projection::cell(row, col))
                    .collect()
            })
            .collect();
        (projection.columns.clone(), rows)
    };

    let header: Vec<String> = columns.iter().map(|c| clip(c, max_cell_width)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| clip(c, max_cell_width)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &body {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{cell:<width$}", width = widths[idx]);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Visual clipping only; control characters are flattened so a cell stays on
/// one line.
fn clip(cell: &str, max: usize) -> String {
    let flat: String = cell
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max {
        return flat;
    }
    let mut clipped: String = flat.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

pub fn render_upload(outcome: &UploadOutcome) -> String {
    match outcome {
        UploadOutcome::Uploaded(receipt) => format!(
            "{}\nDocuments Parsed: {}\nTime Taken: {}\n",
            receipt.message, receipt.documents_parsed, receipt.duration
        ),
        UploadOutcome::Failed { error } => format!("Error: {error}\n"),
    }
}
