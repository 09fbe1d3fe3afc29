//! xpost-compose - Compose one post for several platforms
//!
//! Command-line front end over the compose engine: inspect modes, count and
//! render text, or replay a recorded session of input events through the
//! submit gate.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libxpost::compose::preview;
use libxpost::service::{ComposeAction, ComposeService, Submission, SubmissionText};
use libxpost::{Config, Platform, XpostError};

#[derive(Parser, Debug)]
#[command(name = "xpost-compose")]
#[command(version)]
#[command(about = "Compose one post for several platforms")]
#[command(long_about = "\
xpost-compose - Compose one post for several platforms

DESCRIPTION:
    Modes wrap a shared body in per-platform prefixes and suffixes. This tool
    lists the configured modes, counts text the way platforms do, renders a
    body under a mode, and replays recorded compose sessions.

USAGE EXAMPLES:
    # List modes
    xpost-compose modes

    # Count against every configured limit
    xpost-compose count \"Hello 👋🏽\"

    # Render a body under a mode
    xpost-compose render --mode 11ty \"New release!\"

    # Replay a session and print the submission as JSON
    xpost-compose replay session.json --format json

CONFIGURATION:
    Configuration file: ~/.config/xpost/config.toml
    Override with XPOST_CONFIG or --config. Without a file the built-in
    configuration is used.

EXIT CODES:
    0 - Success
    1 - Configuration or I/O error
    3 - Invalid input or blocked submission
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured modes
    Modes {
        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Count characters against platform limits
    Count {
        /// Text to count
        text: String,

        /// Only these platforms (comma-separated)
        #[arg(short, long)]
        platform: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Decorate a body for each platform of a mode
    Render {
        /// Mode name
        #[arg(short, long)]
        mode: String,

        /// Body text
        body: String,

        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Highlight URLs, mentions and hashtags as HTML
    Preview {
        /// Text to highlight
        text: String,
    },

    /// Replay recorded actions, then submit
    Replay {
        /// JSON array of actions ("-" for stdin)
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();

    libxpost::logging::from_env(cli.verbose).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<XpostError>()
            .map(XpostError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Modes { format } => cmd_modes(config, &format),
        Commands::Count {
            text,
            platform,
            format,
        } => cmd_count(&config, &text, platform.as_deref(), &format),
        Commands::Render { mode, body, format } => cmd_render(config, &mode, &body, &format),
        Commands::Preview { text } => {
            println!("{}", preview::highlight(&text));
            Ok(())
        }
        Commands::Replay { file, format } => cmd_replay(config, &file, &format),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_or_default()?,
    };
    Ok(config)
}

/// List modes with their platforms
fn cmd_modes(config: Config, format: &str) -> Result<()> {
    let service = ComposeService::from_config(config)?;

    if format == "json" {
        let modes: Vec<serde_json::Value> = service
            .templates()
            .iter()
            .map(|mode| {
                serde_json::json!({
                    "name": mode.name,
                    "label": mode.label,
                    "platforms": mode.platforms,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&modes)?);
        return Ok(());
    }

    for mode in service.templates().iter() {
        let platforms: Vec<&str> = mode.platforms.iter().map(Platform::as_str).collect();
        println!("{} | {} | {}", mode.name, mode.label, platforms.join(", "));
    }
    Ok(())
}

/// Count `text` for each requested platform
fn cmd_count(config: &Config, text: &str, platforms: Option<&str>, format: &str) -> Result<()> {
    let limits = config.char_limits();
    let names: Vec<String> = match platforms {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => config.platforms.iter().map(|p| p.name.clone()).collect(),
    };

    let count = config.defaults.counting.count(text);
    let mut counts = Vec::with_capacity(names.len());
    for name in names {
        let limit = *limits
            .get(&name)
            .ok_or_else(|| XpostError::InvalidInput(format!("Unknown platform: {}", name)))?;
        counts.push(libxpost::CharCount::new(Platform::from(name), count, limit));
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    for c in &counts {
        let marker = if c.over_limit { " (over limit)" } else { "" };
        println!("{}: {}/{}{}", c.platform, c.count, c.limit, marker);
    }
    Ok(())
}

/// Print `body` decorated for every platform the mode includes
fn cmd_render(config: Config, mode: &str, body: &str, format: &str) -> Result<()> {
    let service = ComposeService::from_config(config)?;
    let template = service
        .templates()
        .get(mode)
        .ok_or_else(|| XpostError::InvalidInput(format!("Unknown mode: {}", mode)))?;

    let rendered: Vec<(Platform, String)> = template
        .platforms
        .iter()
        .map(|p| (p.clone(), template.apply(p, body)))
        .collect();

    if format == "json" {
        let map: serde_json::Map<String, serde_json::Value> = rendered
            .into_iter()
            .map(|(p, text)| (p.to_string(), serde_json::Value::String(text)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for (platform, text) in rendered {
        println!("--- {} ---", platform);
        println!("{}", text);
    }
    Ok(())
}

/// Dispatch every recorded action, then run the submit gate
fn cmd_replay(config: Config, file: &Path, format: &str) -> Result<()> {
    let input = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read actions from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let actions: Vec<ComposeAction> =
        serde_json::from_str(&input).map_err(XpostError::from)?;
    tracing::debug!(actions = actions.len(), "Replaying session");

    let mut service = ComposeService::from_config(config)?;
    for action in actions {
        service.dispatch(action)?;
    }

    let submission = service.submit()?;
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&submission)?);
    } else {
        print_submission(&submission);
    }
    Ok(())
}

fn print_submission(submission: &Submission) {
    let platforms: Vec<&str> = submission.platforms.iter().map(Platform::as_str).collect();

    println!("session: {}", submission.session_id);
    println!("draft: {}", submission.draft);
    if let Some(mode) = &submission.mode {
        println!("mode: {}", mode);
    }
    println!("platforms: {}", platforms.join(", "));
    if let Some(url) = &submission.link_url {
        println!("link: {}", url);
    }
    for (platform, warning) in &submission.content_warnings {
        println!("cw {}: {}", platform, warning);
    }
    let images = submission.queued_files.len() + submission.draft_images.len();
    if images > 0 {
        println!("images: {}", images);
    }

    match &submission.text {
        SubmissionText::Shared(text) => {
            println!("--- shared ---");
            println!("{}", text);
        }
        SubmissionText::PerPlatform(texts) => {
            for (platform, text) in texts {
                println!("--- {} ---", platform);
                println!("{}", text);
            }
        }
    }
}
