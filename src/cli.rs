//! CLI argument parsing using clap v4

use clap::{Args, Parser, Subcommand};

/// role-registrar - Declarative role registration for host role stores
///
/// Registers the roles declared in the configuration file and applies them
/// to the host role store, copying capabilities from each role's template.
#[derive(Parser, Debug)]
#[command(name = "role-registrar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that talks to the host store
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Path to configuration file
    #[arg(short, long, env = "ROLE_REGISTRAR_CONFIG")]
    pub config: Option<String>,

    /// Override the role store path from the configuration
    #[arg(short, long)]
    pub store: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add the configured roles to the host role store
    Add {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Remove the configured roles from the host role store
    Remove {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// List configured role names in registration order
    List {
        /// Path to configuration file
        #[arg(short, long, env = "ROLE_REGISTRAR_CONFIG")]
        config: Option<String>,
    },

    /// Show the capabilities `add` would send, without changing the store
    Plan {
        #[command(flatten)]
        store: StoreArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a role as stored in the host
    ShowRole {
        /// Role name
        role: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
