// src/client.rs

use crate::{config::AppConfig, error::*};
use anyhow::Context;
use log::debug;
use reqwest::{IntoUrl, Response, StatusCode, header};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Serialize;
use std::sync::Arc;

/// Session-aware HTTP client: one cookie jar for the whole run.
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let inner = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.timeout)
            .build()
            .context("failed to build the HTTP client")?;
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, config })
    }

    /// Fetches a site page with the browser headers; any status is returned
    /// to the caller, which decides whether a failure is fatal.
    pub async fn get_page<T: IntoUrl>(&self, url: T) -> AppResult<(StatusCode, String)> {
        let res = self
            .client
            .get(url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;
        let status = res.status();
        let final_url = res.url().to_string();
        let bytes = res.bytes().await?;
        debug!("page {} -> {} ({} bytes)", final_url, status, bytes.len());
        Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub async fn post_json<T: IntoUrl, B: Serialize + ?Sized>(
        &self,
        url: T,
        body: &B,
    ) -> AppResult<Response> {
        let res = self
            .client
            .post(url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    /// Plain GET for media and document assets: the asset hosts have been
    /// seen to reject requests carrying the browser user agent.
    pub async fn get_asset<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        Ok(self.client.get(url).send().await?)
    }
}
