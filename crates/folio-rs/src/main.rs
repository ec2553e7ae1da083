//! `folio` command-line editor for content documents.

mod commands;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use folio_rs::client::HttpEndpoint;
use folio_rs::config::FolioConfig;
use folio_rs::core::{ContentDefinition, EditSession};
use folio_rs::resolve_definitions;
use log::{debug, info};
use std::path::PathBuf;

/// Command-line options for the folio CLI.
#[derive(Parser)]
#[command(name = "folio", version, about = "Edit path-addressed content documents")]
struct Cli {
    /// Optional path to a folio.json5 config file (skips layered discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Endpoint base URL, overriding config
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the documents that can be edited
    List,
    /// Print a document's default shape
    Defaults {
        name: String,
        /// Print only the value at this dot path
        #[arg(long)]
        path: Option<String>,
    },
    /// Fetch a document and print it merged with its defaults
    Show {
        name: String,
        /// Print only the value at this dot path
        #[arg(long)]
        path: Option<String>,
    },
    /// Write fields and submit the document
    Set {
        name: String,
        /// Field assignments; values are parsed as JSON, falling back to text
        #[arg(value_name = "PATH=VALUE")]
        assignments: Vec<String>,
        /// Upload a file for a field
        #[arg(long = "attach", value_name = "PATH=FILE")]
        attachments: Vec<String>,
        /// Ask the endpoint to remove a field's file
        #[arg(long = "detach", value_name = "PATH")]
        detachments: Vec<String>,
        /// Print the document that would be submitted without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete the stored record
    Delete { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    folio_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting folio (config_set={}, base_url_set={})",
        cli.config.is_some(),
        cli.base_url.is_some()
    );

    let mut config = if let Some(path) = cli.config.as_ref() {
        FolioConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("cwd")?;
        let layered = FolioConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };
    if let Some(base_url) = cli.base_url {
        config.endpoint.base_url = base_url;
    }
    let definitions = resolve_definitions(&config).context("invalid document config")?;

    match cli.command {
        Command::List => {
            for definition in &definitions {
                println!("{}", commands::describe(definition));
            }
        }
        Command::Defaults { name, path } => {
            let definition = find(&definitions, &name)?;
            let value = commands::select(definition.default_shape.as_value(), path.as_deref())?;
            println!("{}", commands::render(value)?);
        }
        Command::Show { name, path } => {
            let endpoint = HttpEndpoint::from_config(&config.endpoint)?;
            let mut session = EditSession::new(find(&definitions, &name)?.clone());
            session.load(&endpoint).await?;
            let value = commands::select(session.document().as_value(), path.as_deref())?;
            println!("{}", commands::render(value)?);
        }
        Command::Set {
            name,
            assignments,
            attachments,
            detachments,
            dry_run,
        } => {
            if assignments.is_empty() && attachments.is_empty() && detachments.is_empty() {
                bail!("nothing to set; pass PATH=VALUE, --attach, or --detach");
            }
            let edits = assignments
                .iter()
                .map(|raw| commands::parse_assignment(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let files = attachments
                .iter()
                .map(|raw| commands::read_attachment(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let endpoint = HttpEndpoint::from_config(&config.endpoint)?;
            let mut session = EditSession::new(find(&definitions, &name)?.clone());
            session.load(&endpoint).await?;
            session.apply_edits(edits)?;
            for (path, file) in files {
                session.set_attachment(&path, Some(file))?;
            }
            for path in detachments {
                session.set_attachment(&path, None)?;
            }

            if dry_run {
                let request = session.save_request();
                for part in &request.parts {
                    println!("# attachment {} -> {}", part.path, part.name);
                }
                println!("{}", commands::render(session.document().as_value())?);
                return Ok(());
            }
            session.submit(&endpoint).await?;
            println!(
                "saved {} (id={})",
                name,
                session.record_id().unwrap_or("unknown")
            );
        }
        Command::Delete { name } => {
            let endpoint = HttpEndpoint::from_config(&config.endpoint)?;
            let mut session = EditSession::new(find(&definitions, &name)?.clone());
            session.load(&endpoint).await?;
            session.delete(&endpoint).await?;
            println!("deleted {name}");
        }
    }

    Ok(())
}

fn find<'a>(
    definitions: &'a [ContentDefinition],
    name: &str,
) -> anyhow::Result<&'a ContentDefinition> {
    match definitions.iter().find(|definition| definition.name == name) {
        Some(definition) => Ok(definition),
        None => {
            let known: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
            bail!("unknown document {name:?} (known: {})", known.join(", "))
        }
    }
}
