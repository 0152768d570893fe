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

//! Translation of user-held search parameters into backend requests.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_backend(self) -> &'static str {
        match self {
            SortOrder::Asc => "ascending",
            SortOrder::Desc => "descending",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl Serialize for SortOrder {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_backend())
    }
}

/// How predicate terms combine on the backend. Only `AND` is sent today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MatchType {
    #[default]
    #[serde(rename = "AND")]
    And,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::And => f.write_str("AND"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FilterParseError {
    #[error("custom filter is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("custom filter must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// One backend request. A submission produces exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestDescriptor {
    /// `GET /get`: blank free text.
    FetchAll,
    /// `GET /getDoc`: free-text search with pagination.
    SimpleQuery {
        text: String,
        skip: usize,
        limit: usize,
    },
    /// `POST /search`: predicate object plus paging, sort, and match mode.
    StructuredFilter {
        predicate: Map<String, Value>,
        limit: usize,
        skip: usize,
        sort: SortOrder,
        match_type: MatchType,
    },
}

/// JSON body of `POST /search`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredBody<'a> {
    pub query: &'a Map<String, Value>,
    pub limit: usize,
    pub start: usize,
    pub sort: SortOrder,
    pub match_type: MatchType,
}

impl RequestDescriptor {
    pub fn endpoint(&self) -> &'static str {
        match self {
            RequestDescriptor::FetchAll => "/get",
            RequestDescriptor::SimpleQuery { .. } => "/getDoc",
            RequestDescriptor::StructuredFilter { .. } => "/search",
        }
    }

    /// Query-string pairs for the GET variants.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            RequestDescriptor::SimpleQuery { text, skip, limit } => vec![
                ("query", text.clone()),
                ("start", skip.to_string()),
                ("limit", limit.to_string()),
            ],
            _ => Vec::new(),
        }
    }

    pub fn structured_body(&self) -> Option<StructuredBody<'_>> {
        match self {
            RequestDescriptor::StructuredFilter {
                predicate,
                limit,
                skip,
                sort,
                match_type,
            } => Some(StructuredBody {
                query: predicate,
                limit: *limit,
                start: *skip,
                sort: *sort,
                match_type: *match_type,
            }),
            _ => None,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            RequestDescriptor::FetchAll => None,
            RequestDescriptor::SimpleQuery { limit, .. }
            | RequestDescriptor::StructuredFilter { limit, .. } => Some(*limit),
        }
    }

    pub fn skip(&self) -> Option<usize> {
        match self {
            RequestDescriptor::FetchAll => None,
            RequestDescriptor::SimpleQuery { skip, .. }
            | RequestDescriptor::StructuredFilter { skip, .. } => Some(*skip),
        }
    }
}

pub fn build_simple_request(text: &str, skip: usize, limit: usize) -> RequestDescriptor {
    RequestDescriptor::SimpleQuery {
        text: text.to_string(),
        skip,
        limit: limit.max(1),
    }
}

pub fn build_structured_request(
    filter_text: &str,
    skip: usize,
    limit: usize,
    sort: SortOrder,
    match_type: MatchType,
) -> Result<RequestDescriptor, FilterParseError> {
    Ok(RequestDescriptor::StructuredFilter {
        predicate: parse_predicate(filter_text)?,
        limit: limit.max(1),
        skip,
        sort,
        match_type,
    })
}

/// An empty filter means "match everything". Anything else, whitespace
/// included, must be a JSON object.
pub fn parse_predicate(filter_text: &str) -> Result<Map<String, Value>, FilterParseError> {
    if filter_text.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(filter_text)? {
        Value::Object(map) => Ok(map),
        other => Err(FilterParseError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Search state held by the caller between edits and read at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    pub query: String,
    pub skip: usize,
    pub limit: usize,
    pub sort: SortOrder,
    pub custom_filter: String,
    pub match_type: MatchType,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            query: String::new(),
            skip: 0,
            limit: 10,
            sort: SortOrder::Desc,
            custom_filter: String::new(),
            match_type: MatchType::And,
        }
    }
}

impl SearchParameters {
    /// Free-text submission. The custom filter is never consulted here.
    pub fn simple_submission(&self) -> RequestDescriptor {
        if self.query.trim().is_empty() {
            RequestDescriptor::FetchAll
        } else {
            build_simple_request(&self.query, self.skip, self.limit)
        }
    }

    /// Filter-panel submission. The free-text query is never consulted here.
    pub fn structured_submission(&self) -> Result<RequestDescriptor, FilterParseError> {
        build_structured_request(
            &self.custom_filter,
            self.skip,
            self.limit,
            self.sort,
            self.match_type,
        )
    }
}
