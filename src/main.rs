use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use evq_core::{config::Config, EventStore, QueryParams};
use evq_source::{load_document, DocumentWatcher};

#[derive(Parser)]
#[command(
    name = "evq",
    about = "evq — query an event listing by text, category, date and weekday"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file; defaults to ./evq.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve /events, /meta and /healthz over HTTP.
    Serve(ServeArgs),
    /// Run one query against the document and print the page as JSON.
    Query(QueryArgs),
    /// Print the distinct types and districts as JSON.
    Meta(DataArg),
}

#[derive(Args)]
struct DataArg {
    /// Event document (JSON array); defaults to `source.path` from the config.
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    data: DataArg,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Do not reload the document when it changes.
    #[arg(long)]
    no_watch: bool,
}

#[derive(Args)]
struct QueryArgs {
    #[command(flatten)]
    data: DataArg,
    /// Free text; every word must appear.
    #[arg(long, default_value = "")]
    q: String,
    #[arg(long = "type", default_value = "")]
    kind: String,
    #[arg(long, default_value = "")]
    district: String,
    /// 0-6 (Sunday = 0) or a day name such as 三 / 週三 / 星期三.
    #[arg(long, default_value = "")]
    weekday: String,
    #[arg(long)]
    free_only: bool,
    #[arg(long, default_value = "")]
    date_from: String,
    #[arg(long, default_value = "")]
    date_to: String,
    #[arg(long, default_value = "")]
    limit: String,
    #[arg(long, default_value = "")]
    offset: String,
}

impl QueryArgs {
    fn params(&self) -> QueryParams {
        QueryParams {
            q: self.q.clone(),
            kind: self.kind.clone(),
            district: self.district.clone(),
            weekday: self.weekday.clone(),
            free_only: self.free_only.to_string(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            limit: self.limit.clone(),
            offset: self.offset.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.debug { "debug" } else { "info" })
            }),
        )
        .init();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Serve(args) => serve(config, args).await,
        Command::Query(args) => {
            let store = load_store(&config, &args.data)?;
            print_json(&store.query(&args.params()))
        }
        Command::Meta(args) => {
            let store = load_store(&config, &args)?;
            print_json(&store.meta())
        }
    }
}

async fn serve(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_watch {
        config.source.watch = false;
    }

    let store = Arc::new(load_store(&config, &args.data)?);
    let path = document_path(&config, &args.data);
    let _watcher = if config.source.watch {
        Some(DocumentWatcher::spawn(path, Arc::clone(&store))?)
    } else {
        None
    };

    evq::server::serve(&config.server.addr(), store).await
}

fn document_path(config: &Config, arg: &DataArg) -> PathBuf {
    arg.data.clone().unwrap_or_else(|| config.source.path.clone())
}

fn load_store(config: &Config, arg: &DataArg) -> anyhow::Result<EventStore> {
    let path = document_path(config, arg);
    let records = load_document(&path)?;
    let store = EventStore::with_events(records);
    tracing::info!(path = %path.display(), events = store.snapshot().len(), "events loaded");
    Ok(store)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
