//! CLI command implementations. Each command returns the text to print so
//! it can be tested against a mocked API.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::alm::{
    AlmApi, AlmApplication, AlmRepository, AlmUnboundApplication, GetAlmOrganizationResponse,
    ProvisionedProject,
};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

#[tracing::instrument(skip(api))]
pub async fn bind<A: AlmApi + ?Sized>(
    api: &A,
    installation_id: &str,
    organization: &str,
) -> Result<String> {
    api.bind_organization(installation_id, organization).await?;
    info!("Bound installation {} to {}", installation_id, organization);
    Ok(format!(
        "Bound installation {} to organization {}",
        installation_id, organization
    ))
}

#[tracing::instrument(skip(api))]
pub async fn app_info<A: AlmApi + ?Sized>(api: &A, format: OutputFormat) -> Result<String> {
    let app = api.get_app_info().await?;
    match format {
        OutputFormat::Json => to_json(&app),
        OutputFormat::Text => Ok(render_app(&app)),
    }
}

#[tracing::instrument(skip(api))]
pub async fn organization<A: AlmApi + ?Sized>(
    api: &A,
    installation_id: &str,
    format: OutputFormat,
) -> Result<String> {
    let response = api.get_organization(installation_id).await?;
    match format {
        OutputFormat::Json => to_json(&response),
        OutputFormat::Text => Ok(render_organization(&response)),
    }
}

#[tracing::instrument(skip(api))]
pub async fn repositories<A: AlmApi + ?Sized>(
    api: &A,
    organization: &str,
    format: OutputFormat,
) -> Result<String> {
    let repos = api.list_repositories(organization).await?;
    match format {
        OutputFormat::Json => to_json(&repos),
        OutputFormat::Text if repos.is_empty() => {
            Ok(format!("No repositories found for {}", organization))
        }
        OutputFormat::Text => Ok(render_repositories(&repos)),
    }
}

#[tracing::instrument(skip(api))]
pub async fn unbound_applications<A: AlmApi + ?Sized>(
    api: &A,
    format: OutputFormat,
) -> Result<String> {
    let apps = api.list_unbound_applications().await?;
    match format {
        OutputFormat::Json => to_json(&apps),
        OutputFormat::Text if apps.is_empty() => Ok("No unbound installations".to_string()),
        OutputFormat::Text => Ok(render_unbound(&apps)),
    }
}

#[tracing::instrument(skip(api))]
pub async fn provision<A: AlmApi + ?Sized>(
    api: &A,
    organization: &str,
    installation_keys: &[String],
    format: OutputFormat,
) -> Result<String> {
    if installation_keys.is_empty() {
        anyhow::bail!("At least one installation key is required");
    }
    let projects = api
        .provision_projects(installation_keys, organization)
        .await?;
    info!(
        "Provisioned {} project(s) in {}",
        projects.len(),
        organization
    );
    match format {
        OutputFormat::Json => to_json(&projects),
        OutputFormat::Text => Ok(render_projects(&projects)),
    }
}

fn render_app(app: &AlmApplication) -> String {
    format!(
        "{} ({})\nInstall: {}",
        app.name, app.key, app.installation_url
    )
}

fn render_organization(response: &GetAlmOrganizationResponse) -> String {
    let org = &response.alm_organization;
    let mut out = format!("{} ({})", org.name, org.key);
    if let Some(description) = &org.description {
        out.push_str(&format!("\n  {}", description));
    }
    if let Some(url) = &org.alm_url {
        out.push_str(&format!("\n  url: {}", url));
    }
    out.push_str(if org.personal {
        "\n  type: personal"
    } else {
        "\n  type: organization"
    });
    match &response.bound_organization {
        Some(bound) => out.push_str(&format!("\n  bound to: {} ({})", bound.name, bound.key)),
        None => out.push_str("\n  not bound"),
    }
    out
}

fn render_repositories(repos: &[AlmRepository]) -> String {
    repos
        .iter()
        .map(|repo| {
            let mut line = repo.label.clone();
            if repo.private {
                line.push_str(" [private]");
            }
            if let Some(key) = &repo.linked_project_key {
                line.push_str(&format!(" -> {}", key));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_unbound(apps: &[AlmUnboundApplication]) -> String {
    apps.iter()
        .map(|app| format!("{}  {} ({})", app.installation_id, app.name, app.key))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_projects(projects: &[ProvisionedProject]) -> String {
    projects
        .iter()
        .map(|p| format!("Provisioned {}", p.project_key))
        .collect::<Vec<_>>()
        .join("\n")
}
