use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use server_api::{Solver, SolverError};
use shared::protocol::ErrorPayload;
use tracing::debug;

#[derive(Debug, Serialize)]
struct UpstreamSolveRequest<'a> {
    cube_string: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpstreamSolveResponse {
    Solved { solution: String },
    Failed(ErrorPayload),
}

/// Forwards facelet strings to an external two-phase solver over HTTP.
pub struct UpstreamSolver {
    http: Client,
    solver_url: String,
}

impl UpstreamSolver {
    pub fn new(solver_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            solver_url: solver_url.into(),
        })
    }
}

#[async_trait]
impl Solver for UpstreamSolver {
    async fn solve(&self, cube_string: &str) -> Result<String, SolverError> {
        debug!(solver_url = %self.solver_url, "forwarding cube to solver");
        let response = self
            .http
            .post(&self.solver_url)
            .json(&UpstreamSolveRequest { cube_string })
            .send()
            .await
            .map_err(|e| SolverError::Transport(e.into()))?;
        let status = response.status();
        let body: UpstreamSolveResponse = response
            .json()
            .await
            .map_err(|e| SolverError::Transport(anyhow!("unreadable solver reply ({status}): {e}")))?;

        match body {
            UpstreamSolveResponse::Solved { solution } if status.is_success() => Ok(solution),
            UpstreamSolveResponse::Solved { .. } => Err(SolverError::Transport(anyhow!(
                "solver answered {status}"
            ))),
            UpstreamSolveResponse::Failed(payload) => {
                Err(SolverError::Rejected(payload.message().to_string()))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/solver_tests.rs"]
mod tests;
