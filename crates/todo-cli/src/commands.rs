use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;

use todo_service::{Deletion, TodoService};
use todo_store::JsonFileStore;
use todo_types::{Envelope, NewTodo, Selector, TodoId, TodoRecord, TodoUpdate};
use todo_server::{ServerConfig, TodoServer};

use crate::cli::*;

/// What a command produced, before formatting.
struct Outcome {
    message: String,
    data: Value,
    records: Vec<TodoRecord>,
}

impl Outcome {
    fn new(message: impl Into<String>, data: Value) -> Self {
        Self { message: message.into(), data, records: Vec::new() }
    }

    fn with_records(message: impl Into<String>, records: Vec<TodoRecord>) -> anyhow::Result<Self> {
        Ok(Self {
            message: message.into(),
            data: serde_json::to_value(&records)?,
            records,
        })
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args, cli.db),
        command => {
            let db = cli.db.unwrap_or_else(|| ServerConfig::default().db_path);
            let service = open_service(&db)?;
            let outcome = execute(&service, command)?;
            let mut out = io::stdout().lock();
            render(&outcome, &cli.format, &mut out)
        }
    }
}

fn open_service(db: &Path) -> anyhow::Result<TodoService> {
    let store = JsonFileStore::open(db)
        .with_context(|| format!("failed to open database {}", db.display()))?;
    debug!(db = %db.display(), "database opened");
    Ok(TodoService::with_store_counter(Arc::new(store)))
}

fn parse_id(raw: &str) -> anyhow::Result<TodoId> {
    Ok(raw.parse::<TodoId>()?)
}

fn execute(service: &TodoService, command: Command) -> anyhow::Result<Outcome> {
    match command {
        Command::Add(args) => cmd_add(service, args),
        Command::List => cmd_show(service, Selector::All),
        Command::Show(args) => cmd_show(service, args.id.parse()?),
        Command::Update(args) => cmd_update(service, args),
        Command::Delete(args) => cmd_delete(service, args),
        Command::Serve(_) => anyhow::bail!("serve does not run against a local store"),
    }
}

/// Config file (or defaults) with `--bind` and `--db` laid over it.
fn serve_config(args: &ServeArgs, db: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(db) = db {
        config.db_path = db;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs, db: Option<PathBuf>) -> anyhow::Result<()> {
    let config = serve_config(&args, db)?;
    println!(
        "Todo server on {} (db: {})",
        config.bind_addr.to_string().bold(),
        config.db_path.display()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(TodoServer::new(config).serve())?;
    Ok(())
}

fn cmd_add(service: &TodoService, args: AddArgs) -> anyhow::Result<Outcome> {
    let mut new = NewTodo::new(args.title).completed(args.completed);
    if let Some(due) = args.due {
        new = new.due(due);
    }
    let record = service.create(new)?;
    Ok(Outcome::new(
        format!("Created new todo entry! Record ID: {}", record.id),
        json!({ "t_id": record.id }),
    ))
}

fn cmd_show(service: &TodoService, selector: Selector) -> anyhow::Result<Outcome> {
    let records = service.read(selector)?;
    let message = match selector {
        Selector::All => "Retrieved all records available.",
        Selector::One(_) => "Requested record(s) found.",
    };
    Outcome::with_records(message, records)
}

fn cmd_update(service: &TodoService, args: UpdateArgs) -> anyhow::Result<Outcome> {
    let id = parse_id(&args.id)?;
    let update = TodoUpdate {
        title: args.title,
        due_date: args.due,
        completed: args.completed,
    };
    let record = service.update(id, update)?;
    Outcome::with_records(format!("Updated information for record ID {id}"), vec![record])
}

fn cmd_delete(service: &TodoService, args: DeleteArgs) -> anyhow::Result<Outcome> {
    let id = parse_id(&args.id)?;
    let message = match service.delete(id, args.dry_run)? {
        Deletion::Removed(id) => format!("Record ID {id} deleted."),
        Deletion::DryRun(id) => format!("Record ID {id} would be deleted (dry run)."),
    };
    Ok(Outcome::new(message, Value::Null))
}

fn render(outcome: &Outcome, format: &OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let envelope = Envelope::success(outcome.message.clone(), outcome.data.clone());
            writeln!(out, "{}", serde_json::to_string_pretty(&envelope)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} {}", "✓".green().bold(), outcome.message)?;
            for record in &outcome.records {
                write_record(record, out)?;
            }
        }
    }
    Ok(())
}

fn write_record(record: &TodoRecord, out: &mut impl Write) -> io::Result<()> {
    let mark = if record.is_completed() { "[x]".green() } else { "[ ]".normal() };
    write!(out, "  {} {} {}", mark, format!("#{}", record.id).yellow(), record.title.bold())?;
    if let Some(due) = record.due_date {
        write!(out, "  {}", format!("due {}", due.to_rfc3339()).cyan())?;
    }
    if let Some(done) = record.completed_date {
        write!(out, "  {}", format!("done {}", done.to_rfc3339()).dimmed())?;
    }
    writeln!(out)
}
