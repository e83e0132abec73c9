use crate::config::{APP_NAME, ENV_CONFIG_DIR, SyncPaths, resolve_config_dir_with};
use crate::error::SkillsyncError;
use crate::fetch;
use crate::git::{SourceKind, detect_source_kind, local_source_name, parse_git_url};
use crate::interactive::{InteractiveResolver, is_interactive};
use crate::path_utils::{collapse_path, expand_path, known_targets};
use crate::report;
use crate::store::{ConfigStore, Source};
use crate::sync;
use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Sync agent skill directories to Cursor, Claude, Codex and more", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration directory for skillsync (default: ~/.skillsync)
    #[arg(short = 'C', long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize config and store directories
    Init,
    /// Fetch skills from all enabled sources (or one named source)
    Fetch {
        /// Only fetch this source
        source: Option<String>,
    },
    /// Sync fetched skills to all enabled targets
    Sync,
    /// View per-source and per-target sync state
    Status,
    /// List all fetched skills
    #[command(alias = "ls")]
    List,
    /// Show the persisted configuration
    Config,
    /// Manage skill sources
    Source(SourceArgs),
    /// Manage sync targets
    Target(TargetArgs),
}

#[derive(Parser)]
#[command(subcommand_required = false)]
pub struct SourceArgs {
    #[command(subcommand)]
    pub command: Option<SourceCommands>,
}

#[derive(Subcommand)]
pub enum SourceCommands {
    /// Add a source: a GitHub URL, owner/repo shorthand, or a local path
    Add {
        input: String,
        /// Subdirectory within the repository to fetch
        #[arg(long)]
        subdir: Option<String>,
    },
    /// Remove a source
    #[command(alias = "rm")]
    Remove { name: String },
    /// Enable a source
    On { name: String },
    /// Disable a source
    Off { name: String },
    /// List sources
    #[command(alias = "ls")]
    List,
}

#[derive(Parser)]
#[command(subcommand_required = false)]
pub struct TargetArgs {
    #[command(subcommand)]
    pub command: Option<TargetCommands>,
}

#[derive(Subcommand)]
pub enum TargetCommands {
    /// Add a target: a known tool name, or a custom name with a path
    Add {
        name: String,
        path: Option<String>,
    },
    /// Remove a target
    #[command(alias = "rm")]
    Remove { name: String },
    /// Enable a target
    On { name: String },
    /// Disable a target
    Off { name: String },
    /// List targets
    #[command(alias = "ls")]
    List,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command.as_ref() else {
        let mut command = Cli::command();
        command.print_help()?;
        println!();
        return Ok(());
    };

    let config_dir = determine_config_dir(cli.config_dir.as_ref())?;
    set_config_dir_env(&config_dir);
    let store = ConfigStore::new(SyncPaths::from_config_dir(config_dir));

    match command {
        Commands::Init => report::init(&store),
        Commands::Fetch { source } => {
            let mut resolver = InteractiveResolver::new(is_interactive());
            fetch::run(&store, source.as_deref(), &mut resolver)
        }
        Commands::Sync => sync::run(&store),
        Commands::Status => report::status(&store),
        Commands::List => report::list(&store),
        Commands::Config => report::show_config(&store),
        Commands::Source(args) => handle_source_command(&store, args),
        Commands::Target(args) => handle_target_command(&store, args),
    }
}

fn set_config_dir_env(config_dir: &Path) {
    // SAFETY: process-global env mutation, done once at CLI startup before
    // any other threads exist, to pass the resolved config dir down to
    // subcommands.
    unsafe {
        env::set_var(ENV_CONFIG_DIR, config_dir);
    }
}

fn determine_config_dir(cli_config_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let has_cli_override = cli_config_dir.is_some();
    let env_override = env::var(ENV_CONFIG_DIR).ok();
    let has_env_override = env_override.is_some();

    // Refuse the default config dir when running inside the skillsync source
    // tree during development
    if !has_cli_override && !has_env_override && is_skillsync_dev_project() {
        let message = t!("errors.dev_project_config_required", env_var = ENV_CONFIG_DIR);
        return Err(anyhow!(message));
    }

    resolve_config_dir_with(
        cli_config_dir.map(|path| path.as_path()),
        env_override.as_deref(),
    )
}

fn is_skillsync_dev_project() -> bool {
    let Ok(current_dir) = env::current_dir() else {
        return false;
    };
    let cargo_toml = current_dir.join("Cargo.toml");
    if !cargo_toml.exists() {
        return false;
    }
    let Ok(content) = fs::read_to_string(&cargo_toml) else {
        return false;
    };
    let Ok(parsed) = toml::from_str::<toml::Value>(&content) else {
        return false;
    };
    parsed
        .get("package")
        .and_then(|pkg| pkg.get("name"))
        .and_then(|name| name.as_str())
        == Some(APP_NAME)
}

fn handle_source_command(store: &ConfigStore, args: &SourceArgs) -> Result<()> {
    match &args.command {
        Some(SourceCommands::Add { input, subdir }) => {
            handle_source_add(store, input, subdir.clone())
        }
        Some(SourceCommands::Remove { name }) => {
            store.remove_source(name)?;
            println!("\n{}\n", t!("source.removed", name = name).green());
            Ok(())
        }
        Some(SourceCommands::On { name }) => {
            store.set_source_enabled(name, true)?;
            println!("\n{}\n", t!("source.enabled", name = name).green());
            Ok(())
        }
        Some(SourceCommands::Off { name }) => {
            store.set_source_enabled(name, false)?;
            println!("\n{}\n", t!("source.disabled", name = name).green());
            Ok(())
        }
        Some(SourceCommands::List) | None => list_sources(store),
    }
}

fn handle_source_add(store: &ConfigStore, input: &str, subdir: Option<String>) -> Result<()> {
    match detect_source_kind(input) {
        SourceKind::Remote => {
            let parsed = parse_git_url(input)?;
            let subdir = subdir.or(parsed.subdir);

            // Adding an existing source re-enables it instead of erroring
            let config = store.load()?;
            if config.sources.contains_key(&parsed.name) {
                store.set_source_enabled(&parsed.name, true)?;
                println!(
                    "\n{}\n",
                    t!("source.reenabled", name = parsed.name).green()
                );
                return Ok(());
            }

            store.add_source(&parsed.name, Source::remote(&parsed.url, subdir.clone()))?;
            println!("\n{}", t!("source.added", name = parsed.name).green());
            println!("{}", t!("source.url_line", url = parsed.url).dimmed());
            if let Some(subdir) = subdir {
                println!("{}", t!("source.subdir_line", subdir = subdir).dimmed());
            }
            println!("\n{}\n", t!("source.fetch_hint").dimmed());
            Ok(())
        }
        SourceKind::Local => {
            let full_path = local_source_name(input)?;
            if !full_path.exists() {
                return Err(SkillsyncError::PathNotFound {
                    path: full_path.display().to_string(),
                }
                .into());
            }
            if !full_path.is_dir() {
                return Err(SkillsyncError::NotADirectory {
                    path: full_path.display().to_string(),
                }
                .into());
            }

            let name = full_path.to_string_lossy().to_string();
            let config = store.load()?;
            if config.sources.contains_key(&name) {
                store.set_source_enabled(&name, true)?;
                println!("\n{}\n", t!("source.reenabled", name = name).green());
                return Ok(());
            }

            store.add_source(&name, Source::local(full_path))?;
            println!("\n{}", t!("source.added_local", name = name).green());
            println!("\n{}\n", t!("source.fetch_hint").dimmed());
            Ok(())
        }
    }
}

fn list_sources(store: &ConfigStore) -> Result<()> {
    let config = store.load()?;

    println!("\n{}\n", t!("source.list_header").bold());
    if config.sources.is_empty() {
        println!("{}", t!("source.list_empty").dimmed());
        println!("{}\n", t!("source.list_empty_hint").dimmed());
        return Ok(());
    }

    for (name, source) in &config.sources {
        let symbol = if source.enabled {
            "✓".green()
        } else {
            "○".dimmed()
        };
        let status = if source.enabled {
            String::new()
        } else {
            format!(" {}", t!("source.list_disabled_suffix").dimmed())
        };
        println!("  {} {}{}", symbol, name.bold(), status);
        if let Some(url) = &source.url {
            println!("    {}", url.dimmed());
        }
        if let Some(subdir) = &source.subdir {
            println!("    {}", t!("source.subdir_line", subdir = subdir).dimmed());
        }
        if let Some(local_path) = &source.local_path {
            println!(
                "    {}",
                t!("source.local_line", path = local_path.display()).dimmed()
            );
        }
    }
    println!();
    Ok(())
}

fn handle_target_command(store: &ConfigStore, args: &TargetArgs) -> Result<()> {
    match &args.command {
        Some(TargetCommands::Add { name, path }) => handle_target_add(store, name, path.as_deref()),
        Some(TargetCommands::Remove { name }) => {
            store.remove_target(name)?;
            println!("\n{}\n", t!("target.removed", name = name).green());
            Ok(())
        }
        Some(TargetCommands::On { name }) => {
            store.set_target_enabled(name, true)?;
            println!("\n{}\n", t!("target.enabled", name = name).green());
            Ok(())
        }
        Some(TargetCommands::Off { name }) => {
            store.set_target_enabled(name, false)?;
            println!("\n{}\n", t!("target.disabled", name = name).green());
            Ok(())
        }
        Some(TargetCommands::List) | None => list_targets(store),
    }
}

fn handle_target_add(store: &ConfigStore, name: &str, path: Option<&str>) -> Result<()> {
    let config = store.load()?;
    if config.targets.contains_key(name) {
        store.set_target_enabled(name, true)?;
        println!("\n{}\n", t!("target.reenabled", name = name).green());
        return Ok(());
    }

    let custom_path = path.map(expand_path);
    store.add_target(name, custom_path)?;

    let config = store.load()?;
    if let Some(target) = config.targets.get(name) {
        println!("\n{}", t!("target.added", name = name).green());
        println!(
            "{}\n",
            t!("target.path_line", path = collapse_path(&target.path)).dimmed()
        );
    }
    Ok(())
}

fn list_targets(store: &ConfigStore) -> Result<()> {
    let config = store.load()?;

    println!("\n{}\n", t!("target.list_header").bold());

    if !config.targets.is_empty() {
        println!("{}", t!("target.configured_header").bold());
        for (name, target) in &config.targets {
            let symbol = if target.enabled {
                "✓".green()
            } else {
                "○".dimmed()
            };
            let status = if target.enabled {
                String::new()
            } else {
                format!(" {}", t!("target.list_disabled_suffix").dimmed())
            };
            println!(
                "  {} {:<15} {}{}",
                symbol,
                name,
                collapse_path(&target.path).dimmed(),
                status
            );
        }
        println!();
    }

    let available: Vec<&str> = known_targets()
        .iter()
        .map(|(known, _)| *known)
        .filter(|known| !config.targets.contains_key(*known))
        .collect();
    if !available.is_empty() {
        println!("{}", t!("target.available_header").bold());
        println!("{}\n", format!("  {}", available.join(", ")).dimmed());
    }
    Ok(())
}
