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

//! Projection of sparse log records onto the fixed syslog field vocabulary.

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Value;

use crate::model::DataRecord;

/// Every field a log record may carry, in display order.
pub const FIELD_VOCABULARY: [&str; 21] = [
    "AppName",
    "Event",
    "EventId",
    "Facility",
    "FacilityString",
    "Groupings",
    "Hostname",
    "Message",
    "MessageRaw",
    "MsgId",
    "NanoTimeStamp",
    "PartitionId",
    "Priority",
    "ProcId",
    "Sender",
    "Severity",
    "SeverityString",
    "StructuredData",
    "Tag",
    "Timestamp",
    "namespace",
];

/// A record with exactly one value per vocabulary field, in vocabulary order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    values: Vec<Value>,
}

impl NormalizedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        FIELD_VOCABULARY
            .iter()
            .position(|name| *name == field)
            .map(|idx| &self.values[idx])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        FIELD_VOCABULARY.iter().copied().zip(self.values.iter())
    }

    pub fn to_record(&self) -> DataRecord {
        self.fields()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Missing keys become `""`; present keys are kept verbatim, falsy or not.
pub fn normalize_record(record: &DataRecord) -> NormalizedRecord {
    let values = FIELD_VOCABULARY
        .iter()
        .map(|field| {
            record
                .get(*field)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()))
        })
        .collect();
    NormalizedRecord { values }
}

pub fn normalize(records: &[DataRecord]) -> Vec<NormalizedRecord> {
    records.iter().map(normalize_record).collect()
}
