use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lookout_core::blueprint::{Blueprint, Endpoint};
use lookout_core::dataset::CameraDataset;
use lookout_core::report::{generate_discovery_report, generate_scrape_report};
use lookout_core::viewer::{ViewerConfig, is_valid_viewer_config};
use lookout_core::{
    CameraExtractor, CategoryDiscoverer, DiscoveryOptions, ProgressCallback, ScrapeOptions,
    ScrapeOrchestrator,
};
use lookout_scanner::{Fetcher, SiteProfile};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Level used when `RUST_LOG` is unset.
pub fn default_log_level(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init_tracing(verbosity: u8, quiet: bool) {
    let default_filter = default_log_level(verbosity, quiet);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(raw).into_owned());
    PathBuf::from(expanded)
}

/// Parse a site address, assuming https when the scheme is missing.
pub fn parse_base_url(line: &str) -> Option<Url> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(line)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(url);
    }

    let with_scheme = format!("https://{}", line);
    Url::parse(&with_scheme).ok().filter(|u| u.host_str().is_some())
}

/// Site profile for replaying a blueprint, rooted at the blueprint's source.
pub fn profile_for_source(source: &str) -> SiteProfile {
    match parse_base_url(source) {
        Some(url) => SiteProfile::new(url.as_str()).unwrap_or_default(),
        None => {
            warn!("Blueprint source '{}' is not a URL, using the default site", source);
            SiteProfile::default()
        }
    }
}

/// A spinner on stderr, hidden entirely in quiet mode.
pub fn progress_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn spinner_callback(spinner: &ProgressBar) -> ProgressCallback {
    let spinner = spinner.clone();
    std::sync::Arc::new(move |message: String| spinner.set_message(message))
}

/// Apply `--button-text`, `--placeholder-path` and `--video-host` overrides.
pub fn apply_site_args(mut profile: SiteProfile, args: &ArgMatches) -> SiteProfile {
    if let Some(text) = args.get_one::<String>("button-text") {
        profile = profile.with_button_trigger(text);
    }
    if let Some(path) = args.get_one::<String>("placeholder-path") {
        profile = profile.with_placeholder_path(path);
    }
    if let Some(host) = args.get_one::<String>("video-host") {
        profile = profile.with_video_host(host);
    }
    profile
}

fn build_fetcher(args: &ArgMatches, track_visits: bool) -> Result<Fetcher> {
    let timeout = args.get_one::<u64>("timeout").copied().unwrap_or(10);
    let mut fetcher = Fetcher::with_timeout(timeout).context("Failed to build HTTP client")?;
    if let Some(agent) = args.get_one::<String>("user-agent") {
        fetcher = fetcher
            .with_user_agent(agent)
            .context("Failed to build HTTP client")?;
    }
    Ok(fetcher.with_visit_tracking(track_visits))
}

fn millis(args: &ArgMatches, id: &str) -> Duration {
    Duration::from_millis(args.get_one::<u64>(id).copied().unwrap_or(0))
}

fn path_arg(args: &ArgMatches, id: &str, default: &str) -> PathBuf {
    expand_path(
        args.get_one::<String>(id)
            .map(String::as_str)
            .unwrap_or(default),
    )
}

fn done(message: String) {
    println!("{} {}", "✓".green().bold(), message);
}

pub async fn handle_discover(args: &ArgMatches, quiet: bool) -> Result<()> {
    let base_url = args
        .get_one::<Url>("base-url")
        .context("--base-url is required")?;
    let output = path_arg(args, "output", lookout_core::blueprint::DEFAULT_BLUEPRINT_FILE);

    let options = DiscoveryOptions {
        max_depth: args.get_one::<usize>("max-depth").copied().unwrap_or(3),
        branch_limit: args.get_one::<usize>("branch-limit").copied().unwrap_or(3),
        delay: millis(args, "delay-ms"),
        ..DiscoveryOptions::default()
    };

    let profile = apply_site_args(SiteProfile::new(base_url.as_str())?, args);
    let spinner = progress_spinner(quiet);

    let mut discoverer = CategoryDiscoverer::new(build_fetcher(args, true)?, profile, options)
        .with_progress_callback(spinner_callback(&spinner));
    let blueprint = discoverer.discover().await;
    spinner.finish_and_clear();

    blueprint
        .save(&output)
        .with_context(|| format!("Failed to write blueprint to {}", output.display()))?;

    if !quiet {
        print!("{}", generate_discovery_report(&blueprint));
        done(format!(
            "Blueprint with {} endpoints written to {}",
            blueprint.endpoints.len(),
            output.display().to_string().bright_white()
        ));
    }
    Ok(())
}

pub async fn handle_scrape(args: &ArgMatches, quiet: bool) -> Result<()> {
    let blueprint_path = path_arg(
        args,
        "blueprint",
        lookout_core::blueprint::DEFAULT_BLUEPRINT_FILE,
    );
    let output = path_arg(args, "output", lookout_core::dataset::DEFAULT_DATASET_FILE);

    let blueprint = Blueprint::load(&blueprint_path).with_context(|| {
        format!(
            "Cannot load blueprint {} (run `lookout discover` first)",
            blueprint_path.display()
        )
    })?;

    let options = ScrapeOptions {
        endpoint_limit: args.get_one::<usize>("limit").copied(),
        endpoint_delay: millis(args, "delay-ms"),
        block_delay: millis(args, "block-delay-ms"),
        inspect_details: args.get_flag("deep"),
    };

    let profile = apply_site_args(profile_for_source(&blueprint.metadata.source), args);
    let spinner = progress_spinner(quiet);

    let mut orchestrator = ScrapeOrchestrator::new(build_fetcher(args, false)?, profile, options)
        .with_progress_callback(spinner_callback(&spinner));
    let dataset = orchestrator.run(&blueprint).await;
    spinner.finish_and_clear();

    dataset
        .save(&output)
        .with_context(|| format!("Failed to write dataset to {}", output.display()))?;

    if !quiet {
        print!("{}", generate_scrape_report(&dataset));
        done(format!(
            "{} cameras written to {}",
            dataset.cameras.len(),
            output.display().to_string().bright_white()
        ));
    }
    Ok(())
}

pub fn handle_export(args: &ArgMatches, quiet: bool) -> Result<()> {
    let input = path_arg(args, "input", lookout_core::dataset::DEFAULT_DATASET_FILE);
    let output = path_arg(args, "output", lookout_core::viewer::DEFAULT_VIEWER_FILE);

    let dataset = CameraDataset::load(&input)
        .with_context(|| format!("Cannot load dataset {}", input.display()))?;
    let config = ViewerConfig::from(&dataset);

    let value = serde_json::to_value(&config).context("Failed to serialize viewer config")?;
    if !is_valid_viewer_config(&value) {
        anyhow::bail!("Viewer config failed validation");
    }

    config
        .save(&output)
        .with_context(|| format!("Failed to write viewer config to {}", output.display()))?;

    if !quiet {
        done(format!(
            "{} cameras exported to {}",
            config.cameras.len(),
            output.display().to_string().bright_white()
        ));
    }
    Ok(())
}

pub async fn handle_inspect(args: &ArgMatches) -> Result<()> {
    let url = args.get_one::<Url>("url").context("--url is required")?;
    let name = args
        .get_one::<String>("name")
        .map(String::as_str)
        .unwrap_or("inspect");

    let profile = apply_site_args(SiteProfile::new(url.as_str())?, args);
    let endpoint = Endpoint::from_path(&[name.to_string()], url.as_str(), " - ")
        .context("Category name must not be empty")?;

    let mut fetcher = build_fetcher(args, false)?;
    let cameras = CameraExtractor::new(&profile)
        .with_detail_inspection(args.get_flag("deep"))
        .extract_endpoint(&mut fetcher, &endpoint)
        .await;

    println!(
        "{}",
        serde_json::to_string_pretty(&cameras).context("Failed to serialize cameras")?
    );
    Ok(())
}
