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

//! Shared wire types used across query building, projection, and rendering.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// One result row as returned by the backend. Keys keep their wire order.
pub type DataRecord = Map<String, Value>;

/// Raw search response: metadata first, data records after.
pub type SearchResponse = Vec<Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_records: i64,
    pub matched_records: i64,
    pub returned_records: i64,
    /// `/get` and `/search` report a duration string such as `"1.2ms"`,
    /// `/getDoc` reports integer nanoseconds.
    #[serde(default)]
    pub total_time: Value,
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub message: String,
    pub documents_parsed: i64,
    pub duration: String,
}

/// Reply to `POST /upload`; the backend reports failures as `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadOutcome {
    Uploaded(UploadReceipt),
    Failed { error: String },
}

impl UploadOutcome {
    pub const FAILED: &'static str = "Upload failed";

    pub fn failed() -> Self {
        UploadOutcome::Failed {
            error: Self::FAILED.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded(_))
    }
}

/// Body of `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total: i64,
}
