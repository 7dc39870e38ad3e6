use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use reaper_core::{AppError, Config, ValidationResult};
use reaper_game::{InstallLocation, PresetCatalog, TextureCatalog};

mod app;

use app::App;

#[derive(Debug, Parser)]
#[command(name = "reaper", version, about = "ARK companion: install detection, config presets, weather")]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Locate the ARK install directory
    Path,
    /// List the built-in config presets
    Presets,
    /// Show or apply a single preset
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Show the game config file path
    ConfigFile {
        /// Open it with the system's default editor
        #[arg(long)]
        open: bool,
    },
    /// Current weather, with automatic fallback across services
    Weather {
        /// Look up this city instead of geolocating by IP
        #[arg(long)]
        city: Option<String>,
    },
    /// List texture assets and whether they exist in the install
    Textures {
        /// Only this category (full name or name without the icon)
        #[arg(long)]
        category: Option<String>,
    },
    /// Run install detection and weather, then print this session's activity
    Activity,
}

#[derive(Debug, Subcommand)]
enum PresetAction {
    /// Print a preset's INI text
    Show { name: String },
    /// Write a preset to the game config file
    Apply { name: String },
}

fn load_config(path: Option<&Path>) -> Result<(Config, ValidationResult), AppError> {
    let loaded = match path {
        Some(path) => Config::load_validated_from(path),
        None => Config::load_validated(),
    };
    Ok(loaded?)
}

/// Print the user-facing message, keeping the full chain for the exit report.
fn report(e: AppError) -> anyhow::Error {
    eprintln!("{}", e.user_message());
    e.into()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, validation) = load_config(cli.config.as_deref()).map_err(report)?;
    let _log_guard = reaper_core::init(&config)?;

    for warning in &validation.warnings {
        tracing::warn!("Config: {}", warning);
    }

    let app = App::new(config)?;
    tracing::info!("Reaper started");
    tracing::debug!("Config directory: {}", app.config().config_dir.display());

    let result = run(&app, cli.command, cli.json).await;
    app.shutdown();

    if let Err(e) = &result {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            eprintln!("{}", app_error.user_message());
        }
    }
    result
}

async fn run(app: &App, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Path => {
            let location = app.detect_install()?;
            if json {
                let value = serde_json::json!({
                    "path": location.path(),
                    "validated": location.is_validated(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_location(&location);
            }
        }
        Command::Presets => {
            let presets = app.presets().all();
            if json {
                println!("{}", serde_json::to_string_pretty(presets)?);
            } else {
                for preset in presets {
                    println!(
                        "{:<18} {:<26} {}",
                        preset.name,
                        preset.description,
                        PresetCatalog::image_path(&preset.name)
                    );
                }
            }
        }
        Command::Preset { action } => match action {
            PresetAction::Show { name } => {
                let preset = app.find_preset(&name)?;
                print!("{}", preset.raw_text);
            }
            PresetAction::Apply { name } => {
                let path = app.apply_preset(&name)?;
                println!("Wrote {}", path.display());
            }
        },
        Command::ConfigFile { open } => {
            let path = if open {
                app.open_config_file()?
            } else {
                app.config_file().path().map_err(AppError::from)?
            };
            println!("{}", path.display());
        }
        Command::Weather { city } => {
            let reading = app
                .refresh_weather(city.as_deref())
                .await
                .ok_or(AppError::Weather(
                    reaper_core::WeatherError::ServiceUnavailable,
                ))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reading)?);
            } else {
                println!(
                    "{}°C (feels like {}°C), {} in {}, {} [{}]",
                    reading.temperature_c,
                    reading.feels_like_c,
                    reading.condition,
                    reading.city,
                    reading.country,
                    reading.source
                );
            }
        }
        Command::Textures { category } => print_textures(app, category.as_deref(), json)?,
        Command::Activity => {
            let _ = app.detect_install();
            app.refresh_weather(None).await;

            let now = Local::now();
            for record in app.activity().recent() {
                println!(
                    "{:<8} {:<10} {}",
                    record.time_ago(now),
                    record.kind,
                    record.title
                );
            }
        }
    }
    Ok(())
}

fn print_location(location: &InstallLocation) {
    match location {
        InstallLocation::Validated(path) => println!("{}", path.display()),
        InstallLocation::BestGuess(path) => {
            println!("{} (not verified)", path.display());
        }
    }
}

fn print_textures(app: &App, category: Option<&str>, json: bool) -> Result<()> {
    let content_root = app
        .resolver()
        .texture_root()
        .map_err(AppError::from)?;
    let fs = app.resolver().file_system().as_ref();

    let entries = match category {
        Some(name) => {
            let category = app
                .textures()
                .category(name)
                .with_context(|| format!("Unknown texture category: {name}"))?;
            TextureCatalog::category_entries(category, &content_root, fs)
        }
        None => app.textures().entries(&content_root, fs),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let present = entries.iter().filter(|e| e.present).count();
    for entry in &entries {
        let mark = if entry.present { "ok" } else { "--" };
        println!("{mark} {}", entry.path.display());
    }
    println!("{present}/{} present under {}", entries.len(), content_root.display());
    Ok(())
}
