//! Command handlers.

use anyhow::{Context, Result};
use serde::Serialize;

use podgate_client::{AccessClient, ClientConfig};
use podgate_core::ResourceIri;

use crate::cli::{Cli, Command, ConfigAction, DefaultAction};

pub async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::load(cli.config.as_deref())?;

    let client = match &cli.command {
        Command::Config {
            action: ConfigAction::Show,
        } => {
            print!("{}", config.to_redacted_toml()?);
            return Ok(());
        }
        _ => AccessClient::from_config(&config)?,
    };

    match cli.command {
        Command::Scheme { resource } => {
            let resource = parse_iri(&resource)?;
            emit(&client.detect_scheme(&resource).await?)
        }
        Command::Access { resource, context } => {
            let resource = parse_iri(&resource)?;
            emit(&client.get_access(&resource, &context.to_context()).await?)
        }
        Command::PrincipalAccess {
            resource,
            principal,
        } => {
            let resource = parse_iri(&resource)?;
            emit(&client.get_principal_access(&resource, &principal).await?)
        }
        Command::Agents { resource } => {
            let resource = parse_iri(&resource)?;
            emit(&client.get_agent_access_all(&resource).await?)
        }
        Command::Set {
            resource,
            principal,
            modes,
        } => {
            let resource = parse_iri(&resource)?;
            tracing::info!(%resource, %principal, "Setting access");
            let saved = client
                .set_access(&resource, &principal, modes.to_access())
                .await?;
            if saved.is_none() {
                tracing::warn!(%resource, "No access-control document to change");
            }
            emit(&saved)
        }
        Command::Default { action } => match action {
            DefaultAction::Get { container, context } => {
                let container = parse_iri(&container)?;
                emit(
                    &client
                        .get_default_access(&container, &context.to_context())
                        .await?,
                )
            }
            DefaultAction::Set {
                container,
                principal,
                modes,
            } => {
                let container = parse_iri(&container)?;
                tracing::info!(%container, %principal, "Setting default access");
                emit(
                    &client
                        .set_default_access(&container, &principal, modes.to_access())
                        .await?,
                )
            }
        },
        Command::Effective { resource } => {
            let resource = parse_iri(&resource)?;
            emit(&client.get_effective_access(&resource).await?)
        }
        Command::DeleteAcl { resource } => {
            let resource = parse_iri(&resource)?;
            let deleted = client.delete_resource_acl(&resource).await?;
            emit(&serde_json::json!({ "deleted": deleted }))
        }
        Command::Config { .. } => Ok(()),
    }
}

fn parse_iri(value: &str) -> Result<ResourceIri> {
    ResourceIri::parse(value).with_context(|| format!("Invalid resource '{value}'"))
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
