use std::path::PathBuf;
use winston::chat::Grounding;
use winston::cli::{Cli, Commands, ConfigAction};
use winston::config::{Config, ConfigValidator};
use winston::error::{Result, WinstonError};
use winston::ingest::{write_chunks, Ingestor};
use winston::retrieval::RetrievalService;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Query {
            query,
            kb,
            limit,
            json,
        } => {
            cmd_query(cli.config, &query, kb.as_deref(), limit, json)?;
        }
        Commands::Ask {
            message,
            kb,
            top_n,
            mode,
            json,
        } => {
            cmd_ask(cli.config, &message, kb.as_deref(), top_n, mode, json)?;
        }
        Commands::Ingest {
            source,
            kb,
            output,
            max_pages,
        } => {
            cmd_ingest(cli.config, &source, kb, output, max_pages)?;
        }
        Commands::Kbs => {
            cmd_kbs(cli.config)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "winston=debug" } else { "winston=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_query(
    config_path: Option<PathBuf>,
    query: &str,
    kb: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let service = RetrievalService::from_config(&config);
    let limit = limit.unwrap_or(service.default_top_k());

    let results = service.retrieve(kb, query, limit)?;

    if json {
        println!("{}", to_json(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No chunks in this knowledge base");
        return Ok(());
    }

    for (idx, result) in results.iter().enumerate() {
        println!("{:>2}. [{:.2}] {}", idx + 1, result.score, result.url());
        println!("    {}", result.preview(120));
    }

    Ok(())
}

fn cmd_ask(
    config_path: Option<PathBuf>,
    message: &str,
    kb: Option<&str>,
    top_n: Option<usize>,
    mode: Option<winston::chat::ChatMode>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let service = RetrievalService::from_config(&config);

    let grounding = Grounding::prepare(&service, &config.chat, kb, message, mode, top_n)?;

    if json {
        println!("{}", to_json(&grounding)?);
        return Ok(());
    }

    println!("KB:        {} ({})", grounding.kb, grounding.strategy);
    println!("Mode:      {}", grounding.mode);
    println!(
        "Confident: {}",
        if grounding.confident {
            "yes"
        } else {
            "no (answer without retrieved context)"
        }
    );
    println!();
    println!("{}", grounding.context);

    Ok(())
}

fn cmd_ingest(
    config_path: Option<PathBuf>,
    source: &str,
    kb: Option<String>,
    output: Option<PathBuf>,
    max_pages: Option<usize>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(max_pages) = max_pages {
        config.ingest.max_pages = max_pages;
    }

    let output = match (output, kb) {
        (Some(path), _) => path,
        (None, kb) => {
            let entry = config.registry().resolve(kb.as_deref())?.clone();
            config
                .corpus
                .data_dir
                .join(format!("{}-chunks.json", entry.id))
        }
    };

    let ingestor = Ingestor::new(config.ingest.clone())?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| WinstonError::Io {
        source: e,
        context: "Failed to create tokio runtime".to_string(),
    })?;
    let report = rt.block_on(ingestor.ingest(source))?;

    write_chunks(&output, &report.chunks)?;

    println!(
        "\nWrote {} chunks from {} pages ({} skipped) → {}",
        report.chunks.len(),
        report.pages.len(),
        report.skipped,
        output.display()
    );

    Ok(())
}

fn cmd_kbs(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let service = RetrievalService::from_config(&config);
    let registry = service.registry();

    println!("Knowledge bases ({})", service.store().data_dir().display());
    println!("===============");

    for entry in registry.entries() {
        let kb = service.store().knowledge_base(&entry.id);
        let marker = if entry.id == registry.default_id() {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<14} {:<12} {:<22} {:>5} chunks  boosts: {}",
            marker,
            entry.id,
            entry.title,
            entry.strategy.to_string(),
            kb.len(),
            if kb.seo.is_some() { "yes" } else { "no" }
        );
    }

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let text = toml::to_string_pretty(&config)?;
            println!("{}", text);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
            println!("  Knowledge bases: {}", config.knowledge_bases.len());
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| WinstonError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            let config = Config::default();
            ConfigValidator::validate(&config)?;
            config.save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::warn!(
            "Config file not found, using defaults. Run 'winston config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;
        return Ok(config);
    }

    Config::load(&path)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| WinstonError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })
}
