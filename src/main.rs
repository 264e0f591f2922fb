use anyhow::{Context, Result};
use clap::Parser;
use mihomo::{Client, Config, Language, LocalizationMode, data};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Player UID to fetch
    uid: Option<String>,

    /// Output language (en, cn, cht, de, es, fr, id, jp, kr, pt, ru, th, vi)
    #[arg(short, long)]
    lang: Option<String>,

    /// Keep the index of every language up to date, not only the selected one
    #[arg(long)]
    i18n: bool,

    /// Proxy URL for all requests (e.g. http://127.0.0.1:7890)
    #[arg(long)]
    proxy: Option<String>,

    /// Directory holding the downloaded index files
    #[arg(long)]
    index_path: Option<PathBuf>,

    /// Base URL of the resource host
    #[arg(long)]
    res_url: Option<String>,

    /// Base URL of the player-data API
    #[arg(long)]
    api_url: Option<String>,

    /// Download missing or outdated index files before fetching
    #[arg(long)]
    update_index: bool,

    /// Print the API response instead of the localized profile
    #[arg(long)]
    raw: bool,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show the paths and URLs in use
    #[arg(long)]
    config: bool,
}

impl Args {
    fn to_config(&self) -> Result<Config> {
        let mut config = Config::default();
        if let Some(lang) = &self.lang {
            config = config.with_language(Language::from_str(lang).map_err(anyhow::Error::msg)?);
        }
        if self.i18n {
            config = config.with_mode(LocalizationMode::All);
        }
        if let Some(index_path) = &self.index_path {
            config = config.with_index_path(index_path);
        }
        if let Some(res_url) = &self.res_url {
            config = config.with_res_url(res_url);
        }
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url);
        }
        Ok(config.with_proxy(self.proxy.clone()))
    }

    fn check_action(&self) -> Result<()> {
        if self.uid.is_none() && !self.update_index {
            anyhow::bail!("Nothing to do: pass a UID or --update-index");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mihomo=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.to_config()?;

    if args.config {
        println!("Paths:");
        println!("  Index:   {}", config.index_path.display());
        println!("  Marker:  {}", data::marker_path(&config).display());
        println!("URLs:");
        println!("  Resources: {}", config.res_url);
        println!("  API:       {}", config.api_url);
        println!("Language: {}", config.language);
        return Ok(());
    }

    args.check_action()?;

    let mut client = Client::new(config).context("Failed to build HTTP client")?;

    if args.update_index {
        client
            .ensure_index()
            .await
            .context("Failed to update index")?;
    }

    let Some(uid) = &args.uid else {
        return Ok(());
    };

    if args.raw {
        let raw = client
            .fetch_raw(uid)
            .await
            .with_context(|| format!("Failed to fetch player {uid}"))?
            .with_context(|| format!("Player {uid} is not available"))?;
        return emit(&raw, args.output.as_ref()).await;
    }

    let profile = client
        .fetch_profile(uid, None)
        .await
        .with_context(|| format!("Failed to fetch player {uid}"))?
        .with_context(|| format!("Player {uid} is not available"))?;
    emit(&profile, args.output.as_ref()).await
}

async fn emit<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
