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

//! HTTP transport for the search backend.
//!
//! The typed methods (`send`, `stats`, `upload_file`) report every failure.
//! The user-facing methods (`search`, `submit`, `upload`) never fail: they log
//! and fall back to the empty projection or [`UploadOutcome::failed`].

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use reqwest::Response;
use reqwest::multipart;
use tracing::info;
use tracing::warn;

use crate::error::ClientError;
use crate::model::IndexStats;
use crate::model::SearchResponse;
use crate::model::UploadOutcome;
use crate::project::Projection;
use crate::project::project;
use crate::query::FilterParseError;
use crate::query::RequestDescriptor;
use crate::session::SearchSession;

const UPLOAD_EXTENSIONS: [&str; 2] = ["csv", "parquet"];

#[derive(Debug, Clone)]
pub struct SearchClient {
    endpoint: String,
    http_client: Client,
}

impl SearchClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(endpoint.to_string()));
        }
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub async fn send(&self, request: &RequestDescriptor) -> Result<SearchResponse, ClientError> {
        let url = self.url(request.endpoint());
        let builder = match request {
            RequestDescriptor::FetchAll => self.http_client.get(&url),
            RequestDescriptor::SimpleQuery { .. } => {
                self.http_client.get(&url).query(&request.query_pairs())
            }
            RequestDescriptor::StructuredFilter { .. } => {
                self.http_client.post(&url).json(&request.structured_body())
            }
        };
        let resp = check_status(builder.send().await?).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn search(&self, request: &RequestDescriptor) -> Projection {
        match self.send(request).await {
            Ok(response) => project(response),
            Err(err) => {
                warn!(endpoint = request.endpoint(), error = %err, "search failed");
                Projection::empty()
            }
        }
    }

    /// Dispatches one submission and commits the result to `session` if it is
    /// still the latest. A filter that failed to parse is never sent.
    pub async fn submit(
        &self,
        session: &SearchSession,
        request: Result<RequestDescriptor, FilterParseError>,
    ) -> Projection {
        let ticket = session.begin();
        let projection = match request {
            Ok(request) => {
                info!(endpoint = request.endpoint(), seq = ticket.seq(), "dispatching search");
                self.search(&request).await
            }
            Err(err) => {
                warn!(seq = ticket.seq(), error = %err, "filter search aborted");
                Projection::empty()
            }
        };
        session.apply(ticket, projection.clone()).await;
        projection
    }

    pub async fn stats(&self) -> Result<IndexStats, ClientError> {
        let resp = self.http_client.get(self.url("/stats")).send().await?;
        let bytes = check_status(resp).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn upload_file(&self, path: &Path) -> Result<UploadOutcome, ClientError> {
        let file_name = uploadable_name(path)?;
        let data = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(file = %file_name, bytes = data.len(), "uploading file");

        let part = multipart::Part::bytes(data).file_name(file_name);
        let form = multipart::Form::new().part("file", part);
        let resp = self
            .http_client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        let bytes = check_status(resp).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn upload(&self, path: &Path) -> UploadOutcome {
        match self.upload_file(path).await {
            Ok(outcome) => {
                if let UploadOutcome::Failed { error } = &outcome {
                    warn!(path = %path.display(), error = %error, "upload rejected by server");
                }
                outcome
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "upload failed");
                UploadOutcome::failed()
            }
        }
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message: message.trim().to_string(),
    })
}

/// File name to send, if the extension is one the backend ingests.
pub fn uploadable_name(path: &Path) -> Result<String, ClientError> {
    let accepted = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            UPLOAD_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        });
    let name = path.file_name().and_then(|name| name.to_str());
    match name {
        Some(name) if accepted => Ok(name.to_string()),
        _ => Err(ClientError::UnsupportedFile(path.to_path_buf())),
    }
}
