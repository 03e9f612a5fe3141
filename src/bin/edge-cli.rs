use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use minimal_pairs_edge::assets::manifest::{scan_audio_directory, write_manifest};
use minimal_pairs_edge::config::loader::load_config;
use minimal_pairs_edge::config::AssetSourceConfig;
use minimal_pairs_edge::http::HeaderPolicy;
use minimal_pairs_edge::routing::BasePath;

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Operator tooling for the minimal-pairs edge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index recorded voices into audio_manifest.json
    Manifest {
        #[arg(long, default_value = "public/audio/bn-IN")]
        audio_dir: PathBuf,

        #[arg(long, default_value = "public/audio/audio_manifest.json")]
        output: PathBuf,
    },
    /// Show how the edge would treat a request path
    Classify {
        path: String,

        #[arg(long, default_value = "/language-learning/minimal-pairs")]
        base_path: String,
    },
    /// Fetch a URL and print its status and headers
    Probe { url: String },
    /// Validate a config file and print the settings it resolves to
    Check { config: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Manifest { audio_dir, output } => {
            let manifest = scan_audio_directory(&audio_dir)?;
            if manifest.total_words == 0 {
                eprintln!("No audio files found in {}", audio_dir.display());
                return Ok(());
            }
            write_manifest(&manifest, &output)?;

            println!("Manifest written to {}", output.display());
            println!("Words:        {}", manifest.total_words);
            println!("Total files:  {}", manifest.total_files);
            println!("Generated at: {}", manifest.generated_at);
            for (word, entry) in manifest.words.iter().take(5) {
                println!(
                    "  {}: {} voices ({})",
                    word,
                    entry.voices.len(),
                    entry.extension.as_str()
                );
            }
            if manifest.words.len() > 5 {
                println!("  ... and {} more words", manifest.words.len() - 5);
            }
        }
        Commands::Classify { path, base_path } => {
            let base_path = BasePath::parse(&base_path)?;
            let report = match base_path.strip(&path) {
                None => json!({ "path": path, "rejected": true }),
                Some(asset_path) => json!({
                    "path": path,
                    "rejected": false,
                    "asset_path": asset_path.as_str(),
                    "policy": HeaderPolicy::for_asset(&asset_path),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Probe { url } => {
            let res = reqwest::Client::new().get(&url).send().await?;
            print_response(res)?;
        }
        Commands::Check { config } => {
            let config = load_config(&config)?;
            let assets = match &config.assets {
                AssetSourceConfig::Directory { root, index } => {
                    json!({ "source": "directory", "root": root, "index": index })
                }
                AssetSourceConfig::Upstream { url } => json!({ "source": "upstream", "url": url }),
            };
            let report = json!({
                "base_path": config.base_path,
                "bind_address": config.listener.bind_address,
                "assets": assets,
                "metrics_enabled": config.observability.metrics_enabled,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let headers: serde_json::Map<String, Value> = res
        .headers()
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().map(Value::from).unwrap_or(Value::Null);
            (name.to_string(), value)
        })
        .collect();

    let report = json!({
        "status": res.status().as_u16(),
        "headers": headers,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
