//! Searchlight CLI
//!
//! Drives a Meilisearch-compatible engine from the shell: index and document
//! CRUD, filtered search, settings, and task polling. Connection settings
//! come from `--host`/`--api-key` or the `SEARCHLIGHT_HOST` /
//! `SEARCHLIGHT_API_KEY` environment variables.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use searchlight::{
    Client, ClientConfig, DocumentRecord, DocumentsQuery, Filter, Page, SearchQuery,
    TaskAcknowledgement,
};

#[derive(Parser)]
#[command(name = "searchlight", version, about = "Client for Meilisearch-compatible search engines")]
struct Cli {
    /// Engine host URL (falls back to SEARCHLIGHT_HOST)
    #[arg(long, global = true)]
    host: Option<String>,

    /// API key (falls back to SEARCHLIGHT_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index operations
    Index {
        #[command(subcommand)]
        command: IndexCommand,
    },
    /// Document operations
    Doc {
        #[command(subcommand)]
        command: DocCommand,
    },
    /// Search an index
    Search(SearchArgs),
    /// Index settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Task operations
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Check engine health
    Health,
}

#[derive(Subcommand)]
enum IndexCommand {
    /// Create an index
    Create {
        uid: String,
        #[arg(long)]
        primary_key: Option<String>,
        #[arg(long)]
        wait: bool,
    },
    /// Create an index only if it does not exist yet
    Ensure {
        uid: String,
        #[arg(long)]
        primary_key: Option<String>,
    },
    /// Fetch one index
    Get { uid: String },
    /// List indexes, paginated
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        page_size: u64,
    },
    /// Change the primary key of an empty index
    Update {
        uid: String,
        primary_key: String,
        #[arg(long)]
        wait: bool,
    },
    /// Delete an index, documents and all
    Delete {
        uid: String,
        #[arg(long)]
        wait: bool,
    },
    /// Fetch index statistics
    Stats { uid: String },
}

#[derive(Subcommand)]
enum DocCommand {
    /// Add or replace documents from a JSON array file ('-' reads stdin)
    Add {
        index: String,
        file: PathBuf,
        #[arg(long)]
        primary_key: Option<String>,
        #[arg(long)]
        wait: bool,
    },
    /// Add or partially update documents from a JSON array file
    Update {
        index: String,
        file: PathBuf,
        #[arg(long)]
        primary_key: Option<String>,
        #[arg(long)]
        wait: bool,
    },
    /// Fetch one document by primary key value
    Get {
        index: String,
        id: String,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// List documents, optionally filtered
    List {
        index: String,
        #[arg(long)]
        filter: Option<String>,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(long)]
        offset: Option<u64>,
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Delete one document
    Delete {
        index: String,
        id: String,
        #[arg(long)]
        wait: bool,
    },
    /// Delete every document in the index
    DeleteAll {
        index: String,
        #[arg(long)]
        wait: bool,
    },
    /// Delete the documents matching a filter
    DeleteFilter {
        index: String,
        filter: String,
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Args)]
struct SearchArgs {
    index: String,
    /// Search text; omit to match all documents
    query: Option<String>,
    #[arg(long)]
    filter: Option<String>,
    #[arg(long)]
    offset: Option<u64>,
    #[arg(long)]
    limit: Option<u64>,
    /// Fields to return per hit
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,
    /// Fields to highlight in _formatted
    #[arg(long, value_delimiter = ',')]
    highlight: Vec<String>,
    /// Fields to crop in _formatted
    #[arg(long, value_delimiter = ',')]
    crop: Vec<String>,
    #[arg(long)]
    crop_length: Option<u64>,
    #[arg(long)]
    crop_marker: Option<String>,
    /// Include match position metadata
    #[arg(long)]
    positions: bool,
    #[arg(long, value_delimiter = ',')]
    facets: Vec<String>,
    /// Sort directives, e.g. year:desc
    #[arg(long, value_delimiter = ',')]
    sort: Vec<String>,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Fetch the current settings
    Get { index: String },
    /// Declare filterable attributes
    Filterable {
        index: String,
        fields: Vec<String>,
        #[arg(long)]
        wait: bool,
    },
    /// Declare searchable attributes
    Searchable {
        index: String,
        fields: Vec<String>,
        #[arg(long)]
        wait: bool,
    },
    /// Declare sortable attributes
    Sortable {
        index: String,
        fields: Vec<String>,
        #[arg(long)]
        wait: bool,
    },
    /// Reset settings to defaults
    Reset {
        index: String,
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Fetch the current state of a task
    Get { uid: u64 },
    /// Poll a task until it reaches a terminal status
    Wait {
        uid: u64,
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let client = build_client(&cli)?;

    match cli.command {
        Command::Index { command } => run_index(&client, command).await,
        Command::Doc { command } => run_doc(&client, command).await,
        Command::Search(args) => run_search(&client, args).await,
        Command::Settings { command } => run_settings(&client, command).await,
        Command::Task { command } => run_task(&client, command).await,
        Command::Health => {
            let health = client.health().await?;
            print_json(&health)
        }
    }
}

fn build_client(cli: &Cli) -> anyhow::Result<Client> {
    let mut config = match &cli.host {
        Some(host) => ClientConfig::new(host),
        None => ClientConfig::from_env()
            .context("no --host given and SEARCHLIGHT_HOST is not set")?,
    };
    if let Some(key) = &cli.api_key {
        config = config.with_api_key(key);
    }
    config = config.with_timeout(Duration::from_secs(cli.timeout_secs));
    Ok(Client::new(config)?)
}

async fn run_index(client: &Client, command: IndexCommand) -> anyhow::Result<()> {
    match command {
        IndexCommand::Create {
            uid,
            primary_key,
            wait,
        } => {
            let ack = client.create_index(&uid, primary_key.as_deref()).await?;
            finish(client, ack, wait).await
        }
        IndexCommand::Ensure { uid, primary_key } => {
            let outcome = client.ensure_index(&uid, primary_key.as_deref()).await?;
            match outcome {
                searchlight::EnsureIndex::Created(ack) => print_json(&ack),
                searchlight::EnsureIndex::AlreadyExists(descriptor) => print_json(&descriptor),
            }
        }
        IndexCommand::Get { uid } => print_json(&client.get_index(&uid).await?),
        IndexCommand::List { page, page_size } => {
            print_json(&client.list_indexes(Page::new(page, page_size)).await?)
        }
        IndexCommand::Update {
            uid,
            primary_key,
            wait,
        } => {
            let ack = client.update_index(&uid, &primary_key).await?;
            finish(client, ack, wait).await
        }
        IndexCommand::Delete { uid, wait } => {
            let ack = client.delete_index(&uid).await?;
            finish(client, ack, wait).await
        }
        IndexCommand::Stats { uid } => print_json(&client.index_stats(&uid).await?),
    }
}

async fn run_doc(client: &Client, command: DocCommand) -> anyhow::Result<()> {
    match command {
        DocCommand::Add {
            index,
            file,
            primary_key,
            wait,
        } => {
            let documents = read_documents(&file)?;
            let ack = client
                .add_or_replace(&index, &documents, primary_key.as_deref())
                .await?;
            finish(client, ack, wait).await
        }
        DocCommand::Update {
            index,
            file,
            primary_key,
            wait,
        } => {
            let documents = read_documents(&file)?;
            let ack = client
                .add_or_update(&index, &documents, primary_key.as_deref())
                .await?;
            finish(client, ack, wait).await
        }
        DocCommand::Get { index, id, fields } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let projection = (!fields.is_empty()).then_some(fields.as_slice());
            let document: DocumentRecord = client.get_document(&index, &id, projection).await?;
            print_json(&document)
        }
        DocCommand::List {
            index,
            filter,
            fields,
            offset,
            limit,
        } => {
            let mut query = DocumentsQuery::new();
            if let Some(filter) = filter {
                query = query.filter(Filter::expr(filter));
            }
            if !fields.is_empty() {
                query = query.fields(fields);
            }
            query.offset = offset;
            query.limit = limit;
            let page: searchlight::DocumentPage<DocumentRecord> =
                client.list_documents(&index, &query).await?;
            print_json(&page)
        }
        DocCommand::Delete { index, id, wait } => {
            let ack = client.delete_document(&index, &id).await?;
            finish(client, ack, wait).await
        }
        DocCommand::DeleteAll { index, wait } => {
            let ack = client.delete_all_documents(&index).await?;
            finish(client, ack, wait).await
        }
        DocCommand::DeleteFilter {
            index,
            filter,
            wait,
        } => {
            let ack = client
                .delete_by_filter(&index, &Filter::expr(filter))
                .await?;
            finish(client, ack, wait).await
        }
    }
}

async fn run_search(client: &Client, args: SearchArgs) -> anyhow::Result<()> {
    let mut query = SearchQuery::new();
    if let Some(text) = args.query {
        query = query.text(text);
    }
    if let Some(filter) = args.filter {
        query = query.filter(Filter::expr(filter));
    }
    query.offset = args.offset;
    query.limit = args.limit;
    if !args.fields.is_empty() {
        query = query.retrieve_attributes(args.fields);
    }
    if !args.highlight.is_empty() {
        query = query.highlight_attributes(args.highlight);
    }
    if !args.crop.is_empty() {
        query.attributes_to_crop = Some(args.crop);
        query.crop_length = args.crop_length;
    }
    if let Some(marker) = args.crop_marker {
        query = query.crop_marker(marker);
    }
    if args.positions {
        query = query.with_match_positions();
    }
    if !args.facets.is_empty() {
        query = query.facets(args.facets);
    }
    if !args.sort.is_empty() {
        query = query.sort(args.sort);
    }

    let results: searchlight::SearchResults<DocumentRecord> =
        client.search(&args.index, &query).await?;
    print_json(&results)
}

async fn run_settings(client: &Client, command: SettingsCommand) -> anyhow::Result<()> {
    match command {
        SettingsCommand::Get { index } => print_json(&client.get_settings(&index).await?),
        SettingsCommand::Filterable { index, fields, wait } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let ack = client.set_filterable_attributes(&index, &fields).await?;
            finish(client, ack, wait).await
        }
        SettingsCommand::Searchable { index, fields, wait } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let ack = client.set_searchable_attributes(&index, &fields).await?;
            finish(client, ack, wait).await
        }
        SettingsCommand::Sortable { index, fields, wait } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let ack = client.set_sortable_attributes(&index, &fields).await?;
            finish(client, ack, wait).await
        }
        SettingsCommand::Reset { index, wait } => {
            let ack = client.reset_settings(&index).await?;
            finish(client, ack, wait).await
        }
    }
}

async fn run_task(client: &Client, command: TaskCommand) -> anyhow::Result<()> {
    match command {
        TaskCommand::Get { uid } => print_json(&client.get_task(uid).await?),
        TaskCommand::Wait {
            uid,
            timeout_secs,
            interval_ms,
        } => {
            let task = client
                .wait_for_task(
                    uid,
                    interval_ms.map(Duration::from_millis),
                    timeout_secs.map(Duration::from_secs),
                )
                .await?;
            print_json(&task)
        }
    }
}

/// Prints the acknowledgement, or the terminal task state with `--wait`.
async fn finish(client: &Client, ack: TaskAcknowledgement, wait: bool) -> anyhow::Result<()> {
    if wait {
        let task = client.wait_for_task(ack.task_uid, None, None).await?;
        print_json(&task)
    } else {
        print_json(&ack)
    }
}

fn read_documents(path: &Path) -> anyhow::Result<Vec<DocumentRecord>> {
    let text = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read documents from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read documents from {}", path.display()))?
    };
    serde_json::from_str(&text).context("documents must be a JSON array of objects")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
