//! `AlmApi` implementation over HTTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;
use crate::poll::{PollError, PollPolicy, fetch_with_retry};

use super::types::envelope;
use super::{
    AlmApi, AlmApplication, AlmRepository, AlmUnboundApplication, GetAlmOrganizationResponse,
    ProvisionedProject,
};

const BASE_PATH: &str = "/api/alm_integration";

pub struct AlmClient {
    http_client: HttpClient,
    server_url: String,
    poll_policy: PollPolicy,
}

impl AlmClient {
    pub fn new(http_client: HttpClient, server_url: &str, poll_policy: PollPolicy) -> Self {
        Self {
            http_client,
            server_url: server_url.trim_end_matches('/').to_string(),
            poll_policy,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll_policy
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}{}/{}", self.server_url, BASE_PATH, action)
    }
}

#[async_trait]
impl AlmApi for AlmClient {
    #[tracing::instrument(skip(self))]
    async fn bind_organization(&self, installation_id: &str, organization: &str) -> Result<()> {
        self.http_client
            .post_form(
                &self.endpoint("bind_organization"),
                &[
                    ("installationId", installation_id),
                    ("organization", organization),
                ],
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to bind installation {} to organization {}",
                    installation_id, organization
                )
            })
    }

    #[tracing::instrument(skip(self))]
    async fn get_app_info(&self) -> Result<AlmApplication> {
        let info: envelope::AppInfo = self
            .http_client
            .get_json(&self.endpoint("show_app_info"))
            .await
            .context("Failed to fetch ALM application info")?;
        Ok(info.application)
    }

    #[tracing::instrument(skip(self))]
    async fn get_organization(&self, installation_id: &str) -> Result<GetAlmOrganizationResponse> {
        let url = self.endpoint("show_organization");
        let http_client = &self.http_client;
        debug!(
            "Polling {} for installation {} (up to {} attempts)...",
            url,
            installation_id,
            self.poll_policy.max_attempts()
        );

        let response = fetch_with_retry(
            installation_id.to_string(),
            &self.poll_policy,
            move |id: String| {
                let url = url.clone();
                async move {
                    http_client
                        .get_json_with_query::<GetAlmOrganizationResponse>(
                            &url,
                            &[("installationId", id.as_str())],
                        )
                        .await
                }
            },
        )
        .await
        .map_err(|e| match e {
            PollError::Other(err) => err.context(format!(
                "Failed to fetch ALM organization for installation {}",
                installation_id
            )),
            PollError::Exhausted => anyhow::Error::from(PollError::Exhausted).context(format!(
                "ALM organization for installation {} is not available yet",
                installation_id
            )),
        })?;

        Ok(GetAlmOrganizationResponse {
            alm_organization: response.alm_organization.with_display_name(),
            bound_organization: response.bound_organization,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn list_repositories(&self, organization: &str) -> Result<Vec<AlmRepository>> {
        let parsed: envelope::Repositories = self
            .http_client
            .get_json_with_query(
                &self.endpoint("list_repositories"),
                &[("organization", organization)],
            )
            .await
            .with_context(|| format!("Failed to list repositories of {}", organization))?;
        Ok(parsed.repositories)
    }

    #[tracing::instrument(skip(self))]
    async fn list_unbound_applications(&self) -> Result<Vec<AlmUnboundApplication>> {
        let parsed: envelope::UnboundApplications = self
            .http_client
            .get_json(&self.endpoint("list_unbound_applications"))
            .await
            .context("Failed to list unbound ALM applications")?;
        Ok(parsed
            .applications
            .into_iter()
            .map(AlmUnboundApplication::with_display_name)
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn provision_projects(
        &self,
        installation_keys: &[String],
        organization: &str,
    ) -> Result<Vec<ProvisionedProject>> {
        let keys = installation_keys.join(",");
        let parsed: envelope::Projects = self
            .http_client
            .post_form_json(
                &self.endpoint("provision_projects"),
                &[
                    ("installationKeys", keys.as_str()),
                    ("organization", organization),
                ],
            )
            .await
            .with_context(|| format!("Failed to provision projects in {}", organization))?;
        Ok(parsed.projects)
    }
}
