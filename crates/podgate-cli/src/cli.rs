//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use podgate_core::{NormalizedAccess, Principal, RequestContext};

/// Podgate - inspect and change access on Solid pods
#[derive(Parser, Debug)]
#[command(name = "podgate", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PODGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which access scheme governs a resource
    Scheme {
        /// Resource IRI
        resource: String,
    },
    /// Show the access a requester has to a resource
    Access {
        /// Resource IRI
        resource: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Show the access granted to one principal itself
    PrincipalAccess {
        /// Resource IRI
        resource: String,
        /// WebID, `public`, `authenticated` or `group:<iri>`
        #[arg(value_parser = parse_principal)]
        principal: Principal,
    },
    /// List the explicit access of every named agent
    Agents {
        /// Resource IRI
        resource: String,
    },
    /// Give a principal exactly the given modes on a resource
    Set {
        /// Resource IRI
        resource: String,
        /// WebID, `public`, `authenticated` or `group:<iri>`
        #[arg(value_parser = parse_principal)]
        principal: Principal,
        #[command(flatten)]
        modes: ModeArgs,
    },
    /// Access inherited by the members of a container
    Default {
        #[command(subcommand)]
        action: DefaultAction,
    },
    /// Show the access the server reports in `WAC-Allow`
    Effective {
        /// Resource IRI
        resource: String,
    },
    /// Delete a resource's own ACL so it inherits again (WAC only)
    DeleteAcl {
        /// Resource IRI
        resource: String,
    },
    /// Configuration operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum DefaultAction {
    /// Show the access a requester inherits
    Get {
        /// Container IRI
        container: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Give a principal exactly the given inherited modes
    Set {
        /// Container IRI
        container: String,
        /// WebID, `public`, `authenticated` or `group:<iri>`
        #[arg(value_parser = parse_principal)]
        principal: Principal,
        #[command(flatten)]
        modes: ModeArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration
    Show,
}

/// Who is asking.
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// WebID of the requesting agent (anonymous if omitted)
    #[arg(long)]
    pub agent: Option<String>,

    /// Client application identifier
    #[arg(long)]
    pub client: Option<String>,

    /// The agent created the resource
    #[arg(long)]
    pub creator: bool,
}

impl ContextArgs {
    pub fn to_context(&self) -> RequestContext {
        RequestContext {
            agent: self.agent.clone(),
            client: self.client.clone(),
            is_creator: self.creator,
        }
    }
}

/// Modes to grant; anything not given is revoked.
#[derive(Args, Debug, Default)]
pub struct ModeArgs {
    #[arg(long)]
    pub read: bool,

    #[arg(long)]
    pub append: bool,

    #[arg(long)]
    pub write: bool,

    /// Read and write access-control metadata
    #[arg(long)]
    pub control: bool,

    #[arg(long)]
    pub control_read: bool,

    #[arg(long)]
    pub control_write: bool,
}

impl ModeArgs {
    pub fn to_access(&self) -> NormalizedAccess {
        NormalizedAccess {
            read: self.read,
            append: self.append,
            write: self.write,
            control_read: self.control || self.control_read,
            control_write: self.control || self.control_write,
        }
        .normalized()
    }
}

pub fn parse_principal(value: &str) -> Result<Principal, String> {
    match value {
        "public" => Ok(Principal::Public),
        "authenticated" => Ok(Principal::Authenticated),
        _ => {
            let (principal, iri) = match value.strip_prefix("group:") {
                Some(iri) => (Principal::group(iri), iri),
                None => (Principal::agent(value), value),
            };
            if iri.starts_with("http://") || iri.starts_with("https://") {
                Ok(principal)
            } else {
                Err(format!("expected an http(s) IRI, got '{iri}'"))
            }
        }
    }
}
