//! Thin HTTP client over `reqwest` with status classification.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

use super::error::{check_status, classify_error};

/// HTTP client used by the integration API.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_query(url, &[]).await
    }

    /// Performs a GET request with query parameters and deserializes the JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(classify_error)
            .context("Failed to send request")?;

        check_status(response)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a form-encoded POST and ignores the response body.
    #[tracing::instrument(skip(self, form))]
    pub async fn post_form<F: Serialize + ?Sized>(&self, url: &str, form: &F) -> Result<()> {
        debug!("POST form to {}...", url);

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(classify_error)
            .context("Failed to send request")?;

        check_status(response).await?;
        Ok(())
    }

    /// Performs a form-encoded POST and deserializes the JSON response.
    #[tracing::instrument(skip(self, form))]
    pub async fn post_form_json<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &F,
    ) -> Result<T> {
        debug!("POST form to {} expecting JSON...", url);

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(classify_error)
            .context("Failed to send request")?;

        check_status(response)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }
}
