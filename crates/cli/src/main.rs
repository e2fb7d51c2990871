//! cropdoc CLI
//!
//! Command-line front end for the plant-disease diagnosis backend:
//! submit a leaf photo with optional field conditions, browse and record
//! outbreaks, and preview remedy markup.
//!
//! Copyright (c) 2025 Michael A Wright

mod report;

use anyhow::{Context, Result};
use backend_bridge::{submit, BackendClient, BackendConfig, CancellationToken, SubmitOutcome};
use clap::{Parser, Subcommand};
use diagnosis_core::echo::{confidence_percent, environment_summary};
use diagnosis_core::{
    markdown, CottonDisease, DiagnosisPage, EnvField, FallbackPolicy, ImageFile,
    InMemoryPreviews, OutbreakReport, ResultView,
};
use std::path::{Path, PathBuf};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nBuild host: ",
    env!("BUILT_HOST"),
    "\nCommit: ",
    env!("BUILT_GIT_COMMIT_HASH"),
    "\nBuilt: ",
    env!("BUILT_TIME_UTC"),
);

#[derive(Parser)]
#[command(name = "cropdoc")]
#[command(about = "Diagnose crop diseases from leaf photos", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Base URL of the diagnosis backend [default: $CROPDOC_BACKEND_URL]
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Request timeout in seconds (no timeout when omitted)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a leaf image for diagnosis
    Diagnose {
        /// Image file to upload
        #[arg(short, long)]
        image: PathBuf,

        /// Place name
        #[arg(long)]
        location: Option<String>,

        /// Air temperature in °C
        #[arg(long)]
        temp: Option<String>,

        /// Relative humidity in percent
        #[arg(long)]
        humidity: Option<String>,

        /// Soil status: dry, moist, wet, waterlogged or cracked
        #[arg(long)]
        soil: Option<String>,

        /// Weather: sunny, cloudy, rainy, stormy or foggy
        #[arg(long)]
        weather: Option<String>,

        /// Fail instead of showing demonstration data when the backend errors
        #[arg(long)]
        no_fallback: bool,

        /// Write an HTML report of the result
        #[arg(long)]
        report: Option<PathBuf>,

        /// Save the reference image returned by the backend
        #[arg(long)]
        save_reference: Option<PathBuf>,
    },

    /// Outbreak map data
    Outbreaks {
        #[command(subcommand)]
        command: OutbreakCommands,
    },

    /// List the cotton diseases the outbreak map knows
    Diseases,

    /// Render remedy markup from a file
    Render {
        /// Markdown file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum OutbreakCommands {
    /// Print every recorded outbreak
    List,

    /// Record a new outbreak
    Add {
        /// Place name to geocode
        #[arg(short, long)]
        place: String,

        /// Disease label or name, e.g. Cotton___Fusarium_wilt
        #[arg(short, long)]
        disease: String,

        /// Severity between 0 and 1
        #[arg(short, long, default_value = "0.5")]
        severity: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = backend_config(cli.backend_url, cli.timeout_secs);

    match cli.command {
        Commands::Diagnose {
            image,
            location,
            temp,
            humidity,
            soil,
            weather,
            no_fallback,
            report,
            save_reference,
        } => {
            let fields = [
                (EnvField::Location, location),
                (EnvField::Temp, temp),
                (EnvField::Humidity, humidity),
                (EnvField::SoilStatus, soil),
                (EnvField::Weather, weather),
            ];
            let policy = if no_fallback {
                FallbackPolicy::Disabled
            } else {
                FallbackPolicy::Demo
            };
            let client = BackendClient::new(config)?;
            let view = diagnose(&client, &image, &fields, policy).await?;

            print_result(&view);
            if let Some(path) = report {
                report::write_report(&view, &path)?;
                println!("\nReport written to {}", path.display());
            }
            if let Some(path) = save_reference {
                if report::save_reference_image(&view, &path)? {
                    println!("Reference image saved to {}", path.display());
                } else {
                    println!("No embedded reference image to save");
                }
            }
            Ok(())
        }
        Commands::Outbreaks { command } => {
            let client = BackendClient::new(config)?;
            match command {
                OutbreakCommands::List => {
                    let points = client.fetch_outbreaks().await?;
                    print_outbreaks(&points);
                }
                OutbreakCommands::Add {
                    place,
                    disease,
                    severity,
                } => {
                    let disease: CottonDisease = disease.parse()?;
                    let report = OutbreakReport::new(place, disease, severity)?;
                    let points = client.add_outbreak(&report).await?;
                    println!("Outbreak recorded ({} total)", points.len());
                    print_outbreaks(&points);
                }
            }
            Ok(())
        }
        Commands::Diseases => {
            for disease in CottonDisease::ALL {
                println!("{:<28} {}", disease.label(), disease.display_name());
            }
            Ok(())
        }
        Commands::Render { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            println!("{}", markdown::render(Some(&text)));
            Ok(())
        }
    }
}

/// Flags win over `CROPDOC_BACKEND_URL`, which wins over the default
fn backend_config(backend_url: Option<String>, timeout_secs: Option<u64>) -> BackendConfig {
    let config = match backend_url {
        Some(url) => BackendConfig::default().with_base_url(url),
        None => BackendConfig::from_env(),
    };
    config.with_timeout_secs(timeout_secs)
}

async fn diagnose(
    client: &BackendClient,
    image: &Path,
    fields: &[(EnvField, Option<String>)],
    policy: FallbackPolicy,
) -> Result<ResultView> {
    let bytes =
        std::fs::read(image).with_context(|| format!("Failed to read {}", image.display()))?;
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let mut page = DiagnosisPage::with_policy(InMemoryPreviews::new(), policy);
    page.set_image(ImageFile::new(name, bytes));
    for (field, value) in fields {
        if let Some(value) = value {
            page.set_field(*field, value)?;
        }
    }
    page.go_to_environment()?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = submit(&mut page, client, &cancel).await?;
    let effects = match outcome {
        SubmitOutcome::Completed(effects) => effects,
        SubmitOutcome::Cancelled => anyhow::bail!("Diagnosis cancelled"),
    };

    let view = page.result().cloned();
    page.teardown();

    match (view, effects.alert) {
        (Some(view), alert) => {
            if let Some(alert) = alert {
                eprintln!("{}", alert);
            }
            Ok(view)
        }
        (None, Some(alert)) => anyhow::bail!("{}", alert),
        (None, None) => anyhow::bail!("No diagnosis result"),
    }
}

fn print_result(view: &ResultView) {
    let prediction = &view.result.prediction;
    if view.result.is_fallback() {
        println!("(demonstration data: the backend request failed)\n");
    }
    println!("Disease:    {}", prediction.disease);
    println!("Severity:   {}", prediction.severity);
    println!("Confidence: {}", confidence_percent(prediction.confidence));

    println!("\nRecommended treatment:\n");
    println!("{}", view.result.remedy_markdown.trim());

    println!("\nEnvironmental details provided:");
    for row in environment_summary(&view.environment) {
        println!("  {:<12} {}", row.label, row.value);
    }
}

fn print_outbreaks(points: &[diagnosis_core::OutbreakPoint]) {
    if points.is_empty() {
        println!("No outbreaks recorded");
        return;
    }
    for point in points {
        println!(
            "{:>9.4} {:>9.4}  {:<5} severity {:.2}  {}",
            point.lat,
            point.lon,
            point.marker_color(),
            point.severity,
            point.display_class()
        );
    }
}
