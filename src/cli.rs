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

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::query::SortOrder;

#[derive(Parser, Debug)]
#[command(name = "sage", version, about = "Client for the Sage log search service")]
pub struct Cli {
    /// Backend base URL (overrides config and SAGE_SERVER_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the global config file
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Free-text search; an empty query lists recent records
    Search(SearchArgs),

    /// Structured filter search
    Find(FindArgs),

    /// Upload a .csv or .parquet file for ingestion
    Upload(UploadArgs),

    /// Show the number of indexed documents
    Stats {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Records to skip
    #[arg(long)]
    pub skip: Option<usize>,

    /// Maximum records to return
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Render against the fixed log field vocabulary
    #[arg(long)]
    pub normalized: bool,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query text
    #[arg(default_value = "")]
    pub query: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// JSON object predicate, or @file
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Sort direction
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// File to upload
    pub path: PathBuf,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}
