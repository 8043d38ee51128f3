//! Payloads of the ALM integration web services.

use serde::{Deserialize, Serialize};

/// The ALM application (e.g. the GitHub App) the server is registered as.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlmApplication {
    pub background_color: Option<String>,
    pub icon_path: Option<String>,
    pub installation_url: String,
    pub key: String,
    pub name: String,
}

/// An organization (or user account) on the ALM side.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlmOrganization {
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub url: Option<String>,
    pub alm_url: Option<String>,
    #[serde(default)]
    pub personal: bool,
}

/// A server organization.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationBase {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetAlmOrganizationResponse {
    pub alm_organization: AlmOrganization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_organization: Option<OrganizationBase>,
}

/// A repository that can be provisioned as a project.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlmRepository {
    pub label: String,
    pub installation_key: String,
    pub linked_project_key: Option<String>,
    pub linked_project_name: Option<String>,
    #[serde(default)]
    pub private: bool,
}

/// An ALM installation not yet bound to any server organization.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlmUnboundApplication {
    pub installation_id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedProject {
    pub project_key: String,
}

/// Response envelopes (internal).
pub(crate) mod envelope {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct AppInfo {
        pub application: AlmApplication,
    }

    #[derive(Deserialize, Debug)]
    pub struct Repositories {
        pub repositories: Vec<AlmRepository>,
    }

    #[derive(Deserialize, Debug)]
    pub struct UnboundApplications {
        pub applications: Vec<AlmUnboundApplication>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Projects {
        pub projects: Vec<ProvisionedProject>,
    }
}

fn display_name(name: &mut String, key: &str) {
    if name.is_empty() {
        *name = key.to_string();
    }
}

impl AlmOrganization {
    /// Fills an empty name with the organization key.
    pub fn with_display_name(mut self) -> Self {
        display_name(&mut self.name, &self.key);
        self
    }
}

impl AlmUnboundApplication {
    /// Fills an empty name with the application key.
    pub fn with_display_name(mut self) -> Self {
        display_name(&mut self.name, &self.key);
        self
    }
}
