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

//! Displayed search state shared between dispatches.
//!
//! Each dispatch takes a [`Ticket`]; a completed response is committed only
//! when its ticket is the most recent one issued, so a slow response to a
//! superseded search can never overwrite a newer result.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use tokio::sync::Mutex;
use tracing::debug;

use crate::project::Projection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    issued: AtomicU64,
    state: Mutex<SessionState>,
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    applied: u64,
    projection: Projection,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> Ticket {
        Ticket(self.issued.load(Ordering::SeqCst))
    }

    /// Returns `false` when the ticket has been superseded and the projection
    /// was discarded.
    pub async fn apply(&self, ticket: Ticket, projection: Projection) -> bool {
        let mut state = self.state.lock().await;
        if ticket != self.latest() || ticket.0 <= state.applied {
            debug!(
                seq = ticket.0,
                latest = self.latest().0,
                "discarding stale search response"
            );
            return false;
        }
        state.applied = ticket.0;
        state.projection = projection;
        true
    }

    pub async fn snapshot(&self) -> Projection {
        self.state.lock().await.projection.clone()
    }
}
