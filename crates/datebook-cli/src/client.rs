//! Async HTTP client wrapping the datebook JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use datebook_core::{Event, EventPatch, NewEvent};
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

/// Connection settings for the datebook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub password: String,
}

/// Async HTTP client for the datebook JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. The
/// client keeps a cookie store: [`ApiClient::login`] captures the session
/// cookie once and every later call sends it automatically.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .cookie_store(true)
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `POST /auth` — exchange the configured password for the session
  /// cookie.
  pub async fn login(&self) -> Result<()> {
    let resp = self
      .client
      .post(self.url("/auth"))
      .json(&json!({ "password": self.config.password }))
      .send()
      .await
      .context("POST /auth failed")?;

    match resp.status() {
      s if s.is_success() => Ok(()),
      reqwest::StatusCode::UNAUTHORIZED => Err(anyhow!("invalid password")),
      s => Err(anyhow!("POST /auth → {s}")),
    }
  }

  /// `GET /events`
  pub async fn list_events(&self) -> Result<Vec<Event>> {
    let resp = self
      .client
      .get(self.url("/events"))
      .send()
      .await
      .context("GET /events failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /events → {}", resp.status()));
    }
    resp.json().await.context("deserialising events")
  }

  /// `POST /events`
  pub async fn create_event(&self, input: &NewEvent) -> Result<Event> {
    let resp = self
      .client
      .post(self.url("/events"))
      .json(input)
      .send()
      .await
      .context("POST /events failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /events → {}", resp.status()));
    }
    resp.json().await.context("deserialising created event")
  }

  /// `PUT /events/{id}`
  pub async fn update_event(&self, id: Uuid, patch: &EventPatch) -> Result<Event> {
    let resp = self
      .client
      .put(self.url(&format!("/events/{id}")))
      .json(patch)
      .send()
      .await
      .context("PUT /events failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("PUT /events/{id} → {}", resp.status()));
    }
    resp.json().await.context("deserialising updated event")
  }

  /// `DELETE /events/{id}`
  pub async fn delete_event(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/events/{id}")))
      .send()
      .await
      .context("DELETE /events failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("DELETE /events/{id} → {}", resp.status()));
    }
    Ok(())
  }
}
