use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fediscope::catalog::Catalog;
use fediscope::config::Config;
use fediscope::export::{ensure_parent_dir, write_csv_file};
use fediscope::normalization::is_entity_id;
use fediscope::query::HttpQueryClient;
use fediscope::sink::{PresentationSink, TableSink, render_html, render_text};
use fediscope::{Command, CommandOutcome, DenyList, Orchestrator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/fediscope.toml";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Find people of a profession who list a fediverse account, and export them as CSV"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Profession label, entity id (Q1930187) or entity URL.
    #[arg(short, long)]
    profession: Option<String>,

    /// Print the profession catalog and exit.
    #[arg(long)]
    list: bool,

    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    html: Option<PathBuf>,

    /// Drop the row with this account from the table and the export.
    #[arg(long = "remove", value_name = "ACCOUNT")]
    remove: Vec<String>,

    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    json_logs: bool,

    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;

    if let Some(catalog) = cli.catalog {
        config.catalog.path = catalog;
    }

    if let Some(output) = cli.output {
        config.export.csv_path = output;
    }

    if let Some(html) = cli.html {
        config.export.html_path = Some(html);
    }

    if let Some(endpoint) = cli.endpoint {
        config.endpoint.sparql_url = endpoint;
    }

    if cli.json_logs {
        config.logging.json = true;
    }

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_tracing(&config)?;

    if cli.list {
        return print_catalog(&config);
    }

    let (entity_id, title) = resolve_profession(&config, cli.profession.as_deref())?;

    info!(
        profession = %title,
        entity_id = %entity_id,
        endpoint = %config.endpoint.sparql_url,
        "starting lookup"
    );

    let mut orchestrator = Orchestrator::new(
        HttpQueryClient::new(config.endpoint.clone()),
        TableSink::default(),
        DenyList::builtin(),
        config.export.thumbnail_width,
    );

    orchestrator
        .dispatch(Command::Lookup {
            profession: entity_id,
        })
        .with_context(|| format!("lookup for {title} failed"))?;

    for address in cli.remove {
        orchestrator.dispatch(Command::RemoveAccount { address })?;
    }

    let rows = orchestrator.sink().rows();
    if rows.is_empty() {
        warn!(profession = %title, "lookup returned no rows");
    }
    print!("{}", render_text(rows));

    if let Some(html_path) = &config.export.html_path {
        ensure_parent_dir(html_path)?;
        fs::write(html_path, render_html(&title, rows))
            .with_context(|| format!("failed to write {}", html_path.display()))?;
        info!(path = %html_path.display(), "html report written");
    }

    if let CommandOutcome::Csv(csv) = orchestrator.dispatch(Command::Export)? {
        write_csv_file(&config.export.csv_path, &csv)?;
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_toml_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_toml_path(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("failed to load config {DEFAULT_CONFIG_PATH}"))
        }
        None => Ok(Config::default()),
    }
}

/// Returns the entity to query and a human-readable title for it.
fn resolve_profession(config: &Config, requested: Option<&str>) -> Result<(String, String)> {
    if let Some(requested) = requested
        && (is_entity_id(requested) || requested.contains('/'))
    {
        return Ok((requested.to_owned(), requested.to_owned()));
    }

    let catalog = Catalog::from_json_path(&config.catalog.path)?;
    let profession = match requested {
        Some(requested) => catalog
            .find(requested)
            .with_context(|| format!("unknown profession {requested:?}"))?,
        None => catalog
            .default_selection(&config.catalog.default_label)
            .context("profession catalog is empty")?,
    };

    Ok((profession.entity_id.clone(), profession.display_text()))
}

fn print_catalog(config: &Config) -> Result<()> {
    let catalog = Catalog::from_json_path(&config.catalog.path)?;
    if catalog.is_empty() {
        anyhow::bail!(
            "profession catalog {} is empty",
            config.catalog.path.display()
        );
    }

    let default_id = catalog
        .default_selection(&config.catalog.default_label)
        .map(|profession| profession.entity_id.as_str());

    for profession in catalog.professions() {
        let marker = if Some(profession.entity_id.as_str()) == default_id {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {}\t{}",
            profession.display_text(),
            profession.entity_id
        );
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    let default_directive = config
        .logging
        .level
        .parse()
        .context("invalid logging.level directive")?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true);

    if config.logging.json {
        builder
            .json()
            .try_init()
            .map_err(|error| anyhow::anyhow!("failed to init JSON logger: {error}"))?;
    } else {
        builder
            .try_init()
            .map_err(|error| anyhow::anyhow!("failed to init logger: {error}"))?;
    }

    Ok(())
}
