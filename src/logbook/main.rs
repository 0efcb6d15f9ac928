use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use logbook::api::LogbookApi;
use logbook::backend::Registry;
use logbook::config::LogbookConfig;
use logbook::envelope::Envelope;
use logbook::error::{LogbookError, Result};
use logbook::model::{Content, Document};
use logbook::store::{DocumentStore, StoreTarget};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands, DocCommands};

const HOME_ENV: &str = "LOGBOOK_HOME";
const LOG_ENV: &str = "LOGBOOK_LOG";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

struct AppContext {
    registry: Registry,
    config: LogbookConfig,
    data_dir: PathBuf,
    backend: String,
    target: StoreTarget,
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List) | None => with_api(&ctx, |api| api.current()),
        Some(Commands::Create { text, color }) => with_api(&ctx, |api| api.create(&text, color)),
        Some(Commands::Update { id, text, color }) => {
            with_api(&ctx, |api| api.update(id, &text, color))
        }
        Some(Commands::Delete { id }) => with_api(&ctx, |api| api.delete(id)),
        Some(Commands::Search { query }) => with_api(&ctx, |api| api.search(&query)),
        Some(Commands::Doc(command)) => handle_doc(&ctx, command),
        Some(Commands::Config { key, value }) => handle_config(ctx, key, value),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("logbook=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match std::env::var_os(HOME_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => ProjectDirs::from("com", "logbook", "logbook")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                LogbookError::Configuration(format!(
                    "could not determine data dir, set {}",
                    HOME_ENV
                ))
            })?,
    };
    let config = LogbookConfig::load(&data_dir)?;

    let backend = cli.backend.clone().unwrap_or_else(|| config.backend.clone());
    let target = match &cli.db {
        Some(db) => db.parse()?,
        None => StoreTarget::File(config.database_path(&data_dir)),
    };
    debug!(data_dir = %data_dir.display(), backend = %backend, store = %target, "Context ready");

    Ok(AppContext {
        registry: Registry::with_defaults(),
        config,
        data_dir,
        backend,
        target,
    })
}

/// Runs one envelope operation and prints the envelope to stdout.
fn with_api<F>(ctx: &AppContext, op: F) -> Result<ExitCode>
where
    F: FnOnce(&mut LogbookApi) -> Vec<u8>,
{
    let mut api = LogbookApi::open(&ctx.registry, &ctx.backend, &ctx.target)?;
    let bytes = op(&mut api);
    println!("{}", String::from_utf8_lossy(&bytes));

    let envelope = Envelope::decode(&bytes)?;
    match envelope.error {
        None => Ok(ExitCode::SUCCESS),
        Some(error) => {
            eprintln!("{} {}", error.code.red().bold(), error.message.red());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_doc(ctx: &AppContext, command: DocCommands) -> Result<ExitCode> {
    let mut store = DocumentStore::open(&ctx.target)?;

    match command {
        DocCommands::Save {
            text,
            id,
            content_type,
            tags,
            color,
        } => {
            let mut content = Content::new(text).with_tags(tags).with_color(color);
            if let Some(content_type) = content_type {
                content = content.with_content_type(content_type);
            }
            let identifier = id.unwrap_or_else(Document::fresh_identifier);
            store.save(&identifier, content)?;
            print_json(&store.get(&identifier)?)?;
        }
        DocCommands::Get { identifier } => print_json(&store.get(&identifier)?)?,
        DocCommands::Delete { identifier } => {
            store.delete(&identifier)?;
            println!("{}", format!("Deleted {}", identifier).green());
        }
        DocCommands::List { content_type, tag } => {
            let docs = match (content_type, tag) {
                (Some(content_type), _) => store.list_by_content_type(&content_type)?,
                (None, Some(tag)) => store.list_by_tag(&tag)?,
                (None, None) => store.list()?,
            };
            if docs.is_empty() {
                eprintln!("{}", "No documents found.".dimmed());
            }
            print_json(&docs)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(
    mut ctx: AppContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<ExitCode> {
    match (key.as_deref(), value) {
        (None, _) => {
            println!("backend = {}", ctx.config.backend);
            println!("database = {}", ctx.config.database);
            println!("{}", format!("data dir: {}", ctx.data_dir.display()).dimmed());
        }
        (Some("backend"), None) => println!("backend = {}", ctx.config.backend),
        (Some("database"), None) => println!("database = {}", ctx.config.database),
        (Some("backend"), Some(v)) => {
            if !ctx.registry.contains(&v) {
                return Err(LogbookError::Configuration(format!(
                    "backend '{}' not registered (known: {})",
                    v,
                    ctx.registry.names().join(", ")
                )));
            }
            ctx.config.backend = v;
            ctx.config.save(&ctx.data_dir)?;
            println!("{}", format!("backend = {}", ctx.config.backend).green());
        }
        (Some("database"), Some(v)) => {
            ctx.config.database = v;
            ctx.config.save(&ctx.data_dir)?;
            println!("{}", format!("database = {}", ctx.config.database).green());
        }
        (Some(other), _) => {
            println!("{}", format!("Unknown config key: {}", other).yellow());
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
