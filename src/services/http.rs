// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST client for the activities API.
//!
//! Handles:
//! - Listing and fetching activities
//! - Create/update with JSON bodies
//! - Mapping HTTP status codes onto `AppError`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::services::ActivityApi;

/// Activities API client.
#[derive(Clone)]
pub struct HttpActivityApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpActivityApi {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/activities", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/activities/{}", self.base_url, urlencoding::encode(id))
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str, id: Option<&str>) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Api(e.to_string()))?;

        let response = check_response(response, id).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Api(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl ActivityApi for HttpActivityApi {
    async fn list(&self) -> Result<Vec<Activity>> {
        self.get_json(&self.collection_url(), None).await
    }

    async fn details(&self, id: &str) -> Result<Activity> {
        self.get_json(&self.item_url(id), Some(id)).await
    }

    async fn create(&self, activity: &Activity) -> Result<()> {
        let response = self
            .http
            .post(self.collection_url())
            .json(activity)
            .send()
            .await
            .map_err(|e| AppError::Api(e.to_string()))?;

        check_response(response, None).await?;
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> Result<()> {
        let response = self
            .http
            .put(self.item_url(&activity.id))
            .json(activity)
            .send()
            .await
            .map_err(|e| AppError::Api(e.to_string()))?;

        check_response(response, Some(&activity.id)).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(|e| AppError::Api(e.to_string()))?;

        check_response(response, Some(id)).await?;
        Ok(())
    }
}

/// Check response status and return an error if not successful.
async fn check_response(response: reqwest::Response, id: Option<&str>) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body, id))
}

fn status_error(status: StatusCode, body: &str, id: Option<&str>) -> AppError {
    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(id.unwrap_or("activities").to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Validation(body.trim().to_string())
        }
        _ => {
            tracing::warn!(status = status.as_u16(), "Activity API returned an error status");
            AppError::Api(format!("HTTP {}: {}", status, body.trim()))
        }
    }
}
