use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    cube,
    domain::{CubeState, FaceColorGrid, MoveToken, Solution},
    protocol::{
        ApplyMoveRequest, ApplyMoveResponse, ClassifyColorsRequest, ClassifyColorsResponse, Reply,
        SolveRequest, SolveResponse, APPLY_MOVE_ROUTE, CLASSIFY_COLORS_ROUTE, SOLVE_ROUTE,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;

/// Image in, nine classified colors out.
#[async_trait]
pub trait ColorClassifier: Send + Sync {
    async fn classify_colors(&self, image: &[u8]) -> Result<FaceColorGrid, ServiceError>;
}

#[async_trait]
pub trait CubeSolver: Send + Sync {
    async fn solve(&self, faces: &CubeState) -> Result<Solution, ServiceError>;
}

/// Must behave as a pure function of `(state, mv)`.
#[async_trait]
pub trait MoveApplier: Send + Sync {
    async fn apply_move(&self, state: &CubeState, mv: MoveToken)
        -> Result<CubeState, ServiceError>;
}

/// Applies moves in-process with the facelet model instead of calling out.
pub struct LocalMoveApplier;

#[async_trait]
impl MoveApplier for LocalMoveApplier {
    async fn apply_move(
        &self,
        state: &CubeState,
        mv: MoveToken,
    ) -> Result<CubeState, ServiceError> {
        Ok(cube::apply_move(state, mv)?)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ServiceConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Talks to the classify, solve and apply-move endpoints of one server.
pub struct HttpCubeServices {
    http: Client,
    base_url: Url,
}

impl HttpCubeServices {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ServiceError::Client)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<B, T>(&self, route: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.base_url.join(route.trim_start_matches('/'))?;
        debug!(%url, "calling cube service");
        let transport = |source| ServiceError::Transport {
            route: route.to_string(),
            source,
        };

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;

        match serde_json::from_slice::<Reply<T>>(&bytes) {
            Ok(Reply::Ok(body)) if status.is_success() => Ok(body),
            Ok(Reply::Err(payload)) => Err(ServiceError::Rejected {
                route: route.to_string(),
                status: status.as_u16(),
                message: payload.message().to_string(),
            }),
            Ok(Reply::Ok(_)) => Err(ServiceError::Rejected {
                route: route.to_string(),
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            }),
            Err(_) if !status.is_success() => Err(ServiceError::Rejected {
                route: route.to_string(),
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).trim().to_string(),
            }),
            Err(err) => Err(ServiceError::InvalidResponse {
                route: route.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}

#[async_trait]
impl ColorClassifier for HttpCubeServices {
    async fn classify_colors(&self, image: &[u8]) -> Result<FaceColorGrid, ServiceError> {
        let request = ClassifyColorsRequest {
            image: format!("data:image/jpeg;base64,{}", STANDARD.encode(image)),
            debug: false,
        };
        let response: ClassifyColorsResponse = self.post(CLASSIFY_COLORS_ROUTE, &request).await?;
        Ok(response.colors)
    }
}

#[async_trait]
impl CubeSolver for HttpCubeServices {
    async fn solve(&self, faces: &CubeState) -> Result<Solution, ServiceError> {
        let request = SolveRequest {
            cube_faces: faces.clone(),
        };
        let response: SolveResponse = self.post(SOLVE_ROUTE, &request).await?;
        Ok(response.into())
    }
}

#[async_trait]
impl MoveApplier for HttpCubeServices {
    async fn apply_move(
        &self,
        state: &CubeState,
        mv: MoveToken,
    ) -> Result<CubeState, ServiceError> {
        let request = ApplyMoveRequest {
            state: state.clone(),
            mv,
        };
        let response: ApplyMoveResponse = self.post(APPLY_MOVE_ROUTE, &request).await?;
        let missing = response.state.missing_faces();
        if !missing.is_empty() {
            return Err(ServiceError::InvalidResponse {
                route: APPLY_MOVE_ROUTE.to_string(),
                reason: format!("returned state lacks {} face(s)", missing.len()),
            });
        }
        Ok(response.state)
    }
}

#[cfg(test)]
#[path = "tests/services_tests.rs"]
mod tests;
