//! role-registrar binary
//!
//! Loads the configured roles, opens the host role store, and runs the
//! requested command against it.

use clap::Parser;
use tracing::{debug, info, warn};

use role_registrar::cli::{Cli, Commands, ConfigSubcommand, StoreArgs};
use role_registrar::config::{self, RegistrarConfig};
use role_registrar::error::{Error, Result};
use role_registrar::logging::{self, LogGuards};
use role_registrar::roles::{
    open_host, MemoryHost, RoleBackend, RoleChange, RoleManager, RoleStore,
};
use role_registrar::version;

fn main() {
    if let Err(e) = run() {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            version::print_version();
            Ok(())
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand)
        }
        Commands::List { config } => {
            let (config, _guards) = load_config(config.as_deref(), cli.verbose, cli.quiet)?;
            let mut manager = RoleManager::new(MemoryHost::new());
            manager.register_all(&config.roles);
            for role in manager.get_roles() {
                println!("{}", role);
            }
            Ok(())
        }
        Commands::Add { store } => {
            let (mut manager, _guards) = open_manager(&store, cli.verbose, cli.quiet)?;
            let applied = manager.add()?;
            for change in &applied {
                println!(
                    "{} {}: {} capabilities",
                    if change.exists { "updated" } else { "created" },
                    change.role,
                    change.capabilities.len()
                );
            }
            Ok(())
        }
        Commands::Remove { store } => {
            let (mut manager, _guards) = open_manager(&store, cli.verbose, cli.quiet)?;
            manager.remove()?;
            for role in manager.get_roles() {
                println!("removed {}", role);
            }
            Ok(())
        }
        Commands::Plan { store, json } => {
            let (manager, _guards) = open_manager(&store, cli.verbose, cli.quiet)?;
            let plan = manager.plan();
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
            Ok(())
        }
        Commands::ShowRole { role, store } => {
            let (manager, _guards) = open_manager(&store, cli.verbose, cli.quiet)?;
            let host_role = manager
                .backend()
                .get_role(&role)
                .ok_or_else(|| Error::RoleNotFound { role: role.clone() })?;
            println!("{}", serde_json::to_string_pretty(&host_role)?);
            Ok(())
        }
    }
}

/// Load configuration and start logging
fn load_config(path: Option<&str>, verbose: u8, quiet: bool) -> Result<(RegistrarConfig, LogGuards)> {
    let config = RegistrarConfig::load(path)?;
    let guards = logging::init_logging(&config.logging, verbose, quiet)?;

    let build = version::build_info();
    debug!(version = %build.full_version(), "Starting role-registrar");
    warn_duplicate_roles(&config);
    Ok((config, guards))
}

fn warn_duplicate_roles(config: &RegistrarConfig) {
    for role in config.duplicate_roles() {
        warn!(role = %role, "Role declared more than once, last declaration wins");
    }
}

/// Load configuration, open the host store and register the configured roles
fn open_manager(
    args: &StoreArgs,
    verbose: u8,
    quiet: bool,
) -> Result<(RoleManager<Box<dyn RoleBackend>>, LogGuards)> {
    let (config, guards) = load_config(args.config.as_deref(), verbose, quiet)?;
    let config = config.with_store_path(args.store.as_deref());

    let host = open_host(&config.store)?;
    let mut manager = RoleManager::new(host);
    manager.register_all(&config.roles);

    info!(roles = manager.len(), store = %config.store.kind, "Roles registered");
    Ok((manager, guards))
}

fn print_plan(plan: &[RoleChange]) {
    if plan.is_empty() {
        println!("No roles configured.");
        return;
    }

    for change in plan {
        let action = match (change.exists, change.is_noop()) {
            (true, true) => "unchanged",
            (true, false) => "update",
            (false, _) => "create",
        };
        println!(
            "{} {} ({}) from {}",
            action,
            change.role,
            change.display_name,
            change.template.as_deref().unwrap_or("-")
        );
        for (capability, grant) in &change.capabilities {
            println!("  + {} = {}", capability, grant);
        }
        for capability in &change.pruned {
            println!("  = {} (already defined)", capability);
        }
    }
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = RegistrarConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let path = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", path.display());
        }
        ConfigSubcommand::Validate { config } => {
            let cfg = RegistrarConfig::load(config.as_deref())?;
            warn_duplicate_roles(&cfg);
            println!("Configuration is valid ({} roles).", cfg.roles.len());
        }
    }

    Ok(())
}
