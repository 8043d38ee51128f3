//! Client for the ALM integration web services.
//!
//! ALM (Application Lifecycle Management) here means an external code
//! hosting service such as GitHub or Bitbucket Cloud whose organizations and
//! repositories can be bound to the server.

mod client;
mod types;

use anyhow::Result;
use async_trait::async_trait;

pub use client::AlmClient;
pub use types::{
    AlmApplication, AlmOrganization, AlmRepository, AlmUnboundApplication,
    GetAlmOrganizationResponse, OrganizationBase, ProvisionedProject,
};

/// Operations of the ALM integration API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlmApi: Send + Sync {
    /// Bind an ALM installation to a server organization.
    async fn bind_organization(&self, installation_id: &str, organization: &str) -> Result<()>;

    /// Fetch the ALM application the server is registered as.
    async fn get_app_info(&self) -> Result<AlmApplication>;

    /// Fetch the ALM organization of an installation.
    ///
    /// A freshly installed application may not be known to the server yet,
    /// so this polls until the organization shows up or the attempt budget
    /// is spent.
    async fn get_organization(&self, installation_id: &str) -> Result<GetAlmOrganizationResponse>;

    /// List the repositories of a server organization's ALM installation.
    async fn list_repositories(&self, organization: &str) -> Result<Vec<AlmRepository>>;

    /// List ALM installations that are not bound to any organization.
    async fn list_unbound_applications(&self) -> Result<Vec<AlmUnboundApplication>>;

    /// Create projects from repositories, identified by their installation keys.
    async fn provision_projects(
        &self,
        installation_keys: &[String],
        organization: &str,
    ) -> Result<Vec<ProvisionedProject>>;
}
