// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thetis CLI entrypoint.
//!
//! Loads a content snapshot and prints content API responses as JSON on stdout. Logs go to
//! stderr, filtered by `THETIS_LOG` (default `warn`).

use std::path::PathBuf;

use schemars::schema_for;
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use thetis::api::{
    ApiError, ContentApi, DocumentAddress, DocumentListing, DocumentResponse, ErrorBody,
    ErrorEntry, NodeResponse, SiteResponse,
};
use thetis::config::{ConfigError, Settings};
use thetis::model::{DimensionPresets, Dimensions, SiteName, WorkspaceName};
use thetis::revalidate::{ChangeBatcher, FlushOutcome, HttpNotifier, RevalidatePayload};
use thetis::store::{ContentStore, PublishError, StoreError};
use thetis::tree::DimensionPresetSource;

const LOG_FILTER_ENV: &str = "THETIS_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --content <snapshot.json> [--config <settings.json>] [--site <name>] [--workspace <name>] <command>\n  {program} schema\n\nCommands:\n  list                                   document listing for all dimension combinations\n  document --path <route>                document by public route path\n  document --context-path <context-path> document by context path\n  node --context-path <context-path>     single node\n  site [--dimensions <dim=v1,v2&...>]    site node (default presets when omitted)\n  publish --workspace <source>           publish a workspace into its base and revalidate\n  schema                                 JSON schemas of all responses\n\nErrors are printed as JSON error bodies and exit with status 1."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Document { path: Option<String>, context_path: Option<String> },
    Node { context_path: String },
    Site { dimensions: Option<String> },
    Publish { source: String },
    Schema,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    content: Option<PathBuf>,
    config: Option<PathBuf>,
    site: Option<String>,
    workspace: Option<String>,
    command: Option<Command>,
}

fn set_once<T>(slot: &mut Option<T>, value: Option<T>) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value.ok_or(())?);
    Ok(())
}

fn parse_command(name: &str, mut args: impl Iterator<Item = String>) -> Result<Command, ()> {
    let command = match name {
        "list" => Command::List,
        "schema" => Command::Schema,
        "document" => {
            let (mut path, mut context_path) = (None, None);
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--path" => set_once(&mut path, args.next())?,
                    "--context-path" => set_once(&mut context_path, args.next())?,
                    _ => return Err(()),
                }
            }
            return Ok(Command::Document { path, context_path });
        }
        "node" => {
            let mut context_path = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--context-path" => set_once(&mut context_path, args.next())?,
                    _ => return Err(()),
                }
            }
            return Ok(Command::Node { context_path: context_path.ok_or(())? });
        }
        "site" => {
            let mut dimensions = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--dimensions" => set_once(&mut dimensions, args.next())?,
                    _ => return Err(()),
                }
            }
            return Ok(Command::Site { dimensions });
        }
        "publish" => {
            let mut source = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--workspace" => set_once(&mut source, args.next())?,
                    _ => return Err(()),
                }
            }
            return Ok(Command::Publish { source: source.ok_or(())? });
        }
        _ => return Err(()),
    };

    if args.next().is_some() {
        return Err(());
    }
    Ok(command)
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--content" => set_once(&mut options.content, args.next().map(PathBuf::from))?,
            "--config" => set_once(&mut options.config, args.next().map(PathBuf::from))?,
            "--site" => set_once(&mut options.site, args.next())?,
            "--workspace" => set_once(&mut options.workspace, args.next())?,
            _ if arg.starts_with('-') => return Err(()),
            name => {
                options.command = Some(parse_command(name, &mut args)?);
                break;
            }
        }
    }

    match &options.command {
        None => return Err(()),
        Some(Command::Schema) => {}
        Some(_) if options.content.is_none() => return Err(()),
        Some(_) => {}
    }

    Ok(options)
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    fn to_body(&self) -> ErrorBody {
        match self {
            Self::Api(err) => err.to_body(),
            other => ErrorBody { errors: vec![ErrorEntry { message: other.to_string(), code: 0 }] },
        }
    }
}

fn to_json(value: &impl Serialize) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Default preset of every dimension.
fn default_dimensions(presets: &DimensionPresets) -> Dimensions {
    presets
        .dimensions()
        .iter()
        .filter_map(|dimension| {
            let preset = dimension.default_preset()?;
            Some((dimension.name.clone(), preset.values.clone()))
        })
        .collect()
}

fn schemas() -> Result<String, CliError> {
    to_json(&json!({
        "documentListing": schema_for!(DocumentListing),
        "documentResponse": schema_for!(DocumentResponse),
        "nodeResponse": schema_for!(NodeResponse),
        "siteResponse": schema_for!(SiteResponse),
        "errorBody": schema_for!(ErrorBody),
        "revalidatePayload": schema_for!(RevalidatePayload),
        "settings": schema_for!(Settings),
    }))
}

fn flush_summary(outcome: FlushOutcome) -> Value {
    match outcome {
        FlushOutcome::Empty => json!({ "status": "empty" }),
        FlushOutcome::Delivered { route_paths } => {
            json!({ "status": "delivered", "routePaths": route_paths })
        }
        FlushOutcome::Failed { route_paths, error } => {
            json!({ "status": "failed", "routePaths": route_paths, "error": error })
        }
    }
}

fn publish(store: &ContentStore, settings: &Settings, source: &str) -> Result<String, CliError> {
    let source = WorkspaceName::new(source)
        .map_err(|err| CliError::InvalidArgument(format!("workspace {source:?}: {err}")))?;

    let notifier = HttpNotifier::new(settings.revalidate.timeout());
    let mut batcher = ChangeBatcher::new(store, store, &notifier, settings.revalidate.target());
    let report = store.publish_workspace(&source, &mut batcher)?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let outcome = runtime.block_on(batcher.flush());

    let published = report.published.iter().map(ToString::to_string).collect::<Vec<_>>();
    to_json(&json!({ "published": published, "revalidation": flush_summary(outcome) }))
}

fn run(options: CliOptions) -> Result<String, CliError> {
    let command =
        options.command.ok_or_else(|| CliError::InvalidArgument("no command".to_owned()))?;
    if command == Command::Schema {
        return schemas();
    }

    let content = options
        .content
        .ok_or_else(|| CliError::InvalidArgument("--content is required".to_owned()))?;
    let settings = Settings::load(options.config.as_deref())?;
    let store = ContentStore::load(&content)?;

    let site = match options.site {
        Some(name) => SiteName::new(name.as_str())
            .ok()
            .and_then(|site| store.site(&site))
            .ok_or(ApiError::UnknownSite(name))?,
        None => store.default_site().ok_or_else(|| ApiError::UnknownSite(String::new()))?,
    }
    .node_name
    .clone();

    let workspace = match options.workspace {
        Some(name) => WorkspaceName::new(name.as_str())
            .map_err(|err| CliError::InvalidArgument(format!("workspace {name:?}: {err}")))?,
        None => WorkspaceName::live(),
    };

    let api = ContentApi::new(&store, &settings);
    match command {
        Command::List => to_json(&api.list_documents(&site, &workspace)?),
        Command::Document { path, context_path } => {
            let address = DocumentAddress::from_parts(path, context_path)?;
            to_json(&api.document(&site, address)?)
        }
        Command::Node { context_path } => to_json(&api.node(&context_path)?),
        Command::Site { dimensions } => {
            let dimensions = match dimensions {
                Some(raw) => Dimensions::parse(&raw).map_err(|err| {
                    CliError::InvalidArgument(format!("dimensions {raw:?}: {err}"))
                })?,
                None => default_dimensions(&store.all_presets()),
            };
            to_json(&api.site(&site, &workspace, &dimensions)?)
        }
        Command::Publish { source } => publish(&store, &settings, &source),
        Command::Schema => schemas(),
    }
}

fn main() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "thetis".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    match run(options) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            match serde_json::to_string_pretty(&err.to_body()) {
                Ok(body) => println!("{body}"),
                Err(_) => eprintln!("thetis: {err}"),
            }
            std::process::exit(1);
        }
    }
}
