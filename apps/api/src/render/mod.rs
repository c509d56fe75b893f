//! PDF and thumbnail regeneration.
//!
//! Rendering is delegated to an external service. The lifecycle only needs
//! the resulting artifact paths, which it stores on the CV row.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::cv::{CvDataRow, CvRow, TemplateRow};

const RENDER_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render service returned {status}: {message}")]
    Service { status: u16, message: String },
}

/// Everything the renderer needs to lay out one CV.
#[derive(Debug, Serialize)]
pub struct RenderRequest<'a> {
    pub cv: &'a CvRow,
    pub cv_data: &'a CvDataRow,
    pub template: &'a TemplateRow,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderedCv {
    pub pdf_path: String,
    pub thumbnail_path: Option<String>,
}

#[async_trait]
pub trait CvRenderer: Send + Sync {
    /// Returns `None` when rendering is not configured.
    async fn render(&self, request: &RenderRequest<'_>) -> Result<Option<RenderedCv>, RenderError>;
}

/// Posts the CV to `RENDER_SERVICE_URL` and reads back the artifact paths.
pub struct HttpCvRenderer {
    client: Client,
    endpoint: String,
}

impl HttpCvRenderer {
    pub fn new(endpoint: String) -> Result<Self, RenderError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(RENDER_TIMEOUT_SECS))
                .build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl CvRenderer for HttpCvRenderer {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<Option<RenderedCv>, RenderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Service {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let rendered: RenderedCv = response.json().await?;
        debug!(cv_id = request.cv.id, pdf = %rendered.pdf_path, "CV rendered");
        Ok(Some(rendered))
    }
}

pub struct DisabledRenderer;

#[async_trait]
impl CvRenderer for DisabledRenderer {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<Option<RenderedCv>, RenderError> {
        info!(
            cv_id = request.cv.id,
            "Render service not configured, skipping PDF regeneration"
        );
        Ok(None)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;
    use crate::models::DbId;

    /// Records which CVs were rendered and answers with fixed paths.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub rendered: Mutex<Vec<DbId>>,
        pub fail: bool,
    }

    #[async_trait]
    impl CvRenderer for RecordingRenderer {
        async fn render(
            &self,
            request: &RenderRequest<'_>,
        ) -> Result<Option<RenderedCv>, RenderError> {
            if self.fail {
                return Err(RenderError::Service {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            self.rendered.lock().unwrap().push(request.cv.id);
            Ok(Some(RenderedCv {
                pdf_path: format!("cvs/{}.pdf", request.cv.uid),
                thumbnail_path: Some(format!("thumbnails/{}.png", request.cv.uid)),
            }))
        }
    }
}
