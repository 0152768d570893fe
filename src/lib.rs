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

//! Client for the Sage log search service: request building, response
//! projection, and the HTTP transport behind the `sage` binary.

pub mod cli;
pub mod client;
pub mod config;
pub mod duration;
pub mod error;
pub mod model;
pub mod normalize;
pub mod output;
pub mod project;
pub mod query;
pub mod session;

pub use client::SearchClient;
pub use error::ClientError;
pub use project::Projection;
pub use project::project;
pub use query::RequestDescriptor;
pub use query::SearchParameters;
pub use session::SearchSession;
