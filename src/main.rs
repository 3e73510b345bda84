//! grades-dashboard: terminal dashboard for grade records
//!
//! Browse grades from the grades API or a local grades file, export them as
//! reports, and detect newly published grades.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{parser::ValueSource, CommandFactory, FromArgMatches, Parser, Subcommand};
use clap_complete::{generate, Shell};
use grades_dashboard::{
    cli,
    config::{self, AppConfig, ConfigOverrides},
    palette::ThemeName,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "grades-dashboard")]
#[command(version)]
#[command(about = "Terminal dashboard for filtering, grouping and color-coding grades", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  New grades found (with --fail-on-new)
    3  Error occurred

EXAMPLES:
    # Interactive dashboard against the local backend
    grades-dashboard view

    # Read a grades file and print a table for one semester
    grades-dashboard view --file grades.json --semester S1 -o table

    # Export CSV
    grades-dashboard view --file grades.json -o csv -O grades.csv

    # Notify about grades published since the last snapshot
    grades-dashboard new-grades grades_old.json grades.json --notify my-topic")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `view` subcommand
#[derive(Parser)]
struct ViewArgs {
    /// Base URL of the grades API; typing it also ignores a grades file
    /// set in the config file
    #[arg(long, env = "GRADES_API_BASE")]
    api: Option<String>,

    /// Set when `--api` was typed rather than read from the environment
    #[arg(skip)]
    api_typed: bool,

    /// Read a nested grades JSON file instead of the API
    #[arg(long)]
    file: Option<PathBuf>,

    /// Case-insensitive search over module, course and grade type
    #[arg(long)]
    search: Option<String>,

    /// Only show this year
    #[arg(long)]
    year: Option<String>,

    /// Only show this semester
    #[arg(long)]
    semester: Option<String>,

    /// Only show this module
    #[arg(long)]
    module: Option<String>,

    /// Color theme (defaults to the saved choice, then the terminal background)
    #[arg(long, value_enum)]
    theme: Option<ThemeName>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format [default: auto, dashboard if interactive, table otherwise]
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `new-grades` subcommand
#[derive(Parser)]
struct NewGradesArgs {
    /// Previous grades file
    old: PathBuf,

    /// Current grades file
    new: PathBuf,

    /// Output format [default: auto]
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Publish new grades to this ntfy topic
    #[arg(long = "notify", value_name = "TOPIC", env = "GRADES_NTFY_TOPIC")]
    notify: Option<String>,

    /// ntfy server URL
    #[arg(long)]
    ntfy_server: Option<String>,

    /// Exit with code 1 if any new grade is found
    #[arg(long)]
    fail_on_new: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse grades in the dashboard or print a report
    View(ViewArgs),

    /// List grades present in NEW but not in OLD and notify about them
    NewGrades(NewGradesArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Write an example config to the user config directory
    Init,
}

/// Parse arguments, recording whether `--api` came from the command line.
fn try_parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = Cli::command().try_get_matches_from(args)?;
    let mut cli = Cli::from_arg_matches(&matches)?;
    if let (Commands::View(view), Some(("view", sub))) = (&mut cli.command, matches.subcommand()) {
        view.api_typed = sub.value_source("api") == Some(ValueSource::CommandLine);
    }
    Ok(cli)
}

fn main() {
    let cli = try_parse_cli(std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(grades_dashboard::pipeline::exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::View(args) => {
            let overrides = ConfigOverrides {
                api_base: args.api,
                prefer_api: args.api_typed,
                grades_file: args.file,
                timeout_secs: args.timeout,
                search: args.search,
                year: args.year,
                semester: args.semester,
                module: args.module,
                format: args.output,
                output_file: args.output_file,
                no_color: cli.no_color,
                ..ConfigOverrides::default()
            };

            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = &loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }

            cli::run_view(config, args.theme, cli.quiet)
        }

        Commands::NewGrades(args) => {
            let overrides = ConfigOverrides {
                format: args.output,
                output_file: args.output_file,
                no_color: cli.no_color,
                ntfy_topic: args.notify,
                ntfy_server: args.ntfy_server,
                ..ConfigOverrides::default()
            };

            let (app, _) = AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);

            cli::run_new_grades(cli::NewGradesConfig {
                old: args.old,
                new: args.new,
                fail_on_new: args.fail_on_new,
                quiet: cli.quiet,
                app,
            })
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "grades-dashboard", &mut io::stdout());
            Ok(0)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema().context("failed to generate schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(0)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (app, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&app).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(0)
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("grades-dashboard").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(0)
            }
            ConfigAction::Init => {
                let target = cli.config.unwrap_or_else(config::default_config_path);
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(0)
            }
        },
    }
}
