use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use server_api::{Classifier, ClassifierError};
use shared::{
    domain::FaceColorGrid,
    protocol::{ClassifyColorsRequest, ErrorPayload},
};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpstreamClassifyResponse {
    Classified { colors: FaceColorGrid },
    Failed(ErrorPayload),
}

/// Forwards face images unchanged to an external color classifier.
pub struct UpstreamClassifier {
    http: Client,
    classifier_url: String,
}

impl UpstreamClassifier {
    pub fn new(classifier_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            classifier_url: classifier_url.into(),
        })
    }
}

#[async_trait]
impl Classifier for UpstreamClassifier {
    async fn classify(
        &self,
        request: &ClassifyColorsRequest,
    ) -> Result<FaceColorGrid, ClassifierError> {
        debug!(classifier_url = %self.classifier_url, "forwarding image to classifier");
        let response = self
            .http
            .post(&self.classifier_url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClassifierError::Transport(e.into()))?;
        let status = response.status();
        let body: UpstreamClassifyResponse = response.json().await.map_err(|e| {
            ClassifierError::Transport(anyhow!("unreadable classifier reply ({status}): {e}"))
        })?;

        match body {
            UpstreamClassifyResponse::Classified { colors } if status.is_success() => Ok(colors),
            UpstreamClassifyResponse::Classified { .. } => Err(ClassifierError::Transport(
                anyhow!("classifier answered {status}"),
            )),
            UpstreamClassifyResponse::Failed(payload) => {
                Err(ClassifierError::Rejected(payload.message().to_string()))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
