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

//! Elapsed-time strings reported by the backend (`"12ms"`, `"1.5s"`, ...)
//! converted to fixed-point seconds for display.

use serde_json::Value;

/// Rendered when the input cannot be understood. Timing is informational,
/// so a malformed value never fails the caller.
pub const ZERO_SECONDS: &str = "0.0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl Unit {
    // Longer suffixes first: every unit ends in "s".
    const SUFFIXES: [(&'static str, Unit); 4] = [
        ("ms", Unit::Millis),
        ("µs", Unit::Micros),
        ("ns", Unit::Nanos),
        ("s", Unit::Seconds),
    ];

    fn divisor(self) -> f64 {
        match self {
            Unit::Seconds => 1.0,
            Unit::Millis => 1e3,
            Unit::Micros => 1e6,
            Unit::Nanos => 1e9,
        }
    }
}

/// Converts a JSON value holding `<number><unit>` to seconds with four
/// decimals. Non-string values yield [`ZERO_SECONDS`].
pub fn parse_duration(value: &Value) -> String {
    match value {
        Value::String(text) => parse_duration_str(text),
        _ => ZERO_SECONDS.to_string(),
    }
}

fn parse_duration_str(text: &str) -> String {
    match seconds(text) {
        Some(secs) => format!("{secs:.4}"),
        None => ZERO_SECONDS.to_string(),
    }
}

fn seconds(text: &str) -> Option<f64> {
    let (number, unit) = Unit::SUFFIXES
        .iter()
        .find_map(|(suffix, unit)| text.strip_suffix(suffix).map(|n| (n, *unit)))?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    Some(value / unit.divisor())
}
