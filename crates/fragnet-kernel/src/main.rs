//! `fragnet` command line: seed, build and validate fragnets from JSON files.

use anyhow::{bail, Context};
use clap::{Arg, ArgMatches, Command};
use fragnet_kernel::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Link between two activities, addressed by activity id
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkRequest {
    from: String,
    to: String,
    #[serde(rename = "type", default)]
    link_type: LinkType,
    #[serde(default)]
    lag_days: i32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_arg = Arg::new("config")
        .long("config")
        .value_parser(clap::value_parser!(PathBuf))
        .help("TOML configuration file");

    let cli = Command::new("fragnet")
        .version(fragnet_kernel::VERSION)
        .about("Build, validate and export schedule fragnets")
        .subcommand_required(true)
        .subcommand(
            Command::new("seed")
                .about("Seed a fragnet from activities and print it")
                .arg(
                    Arg::new("activities")
                        .long("activities")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("JSON list of activity records"),
                )
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("build")
                .about("Seed, link, validate and export a fragnet")
                .arg(
                    Arg::new("activities")
                        .long("activities")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("JSON list of activity records"),
                )
                .arg(
                    Arg::new("links")
                        .long("links")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("JSON list of links addressed by activity id"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Write the export here instead of stdout"),
                )
                .arg(config_arg),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate an exported fragnet")
                .arg(
                    Arg::new("fragnet")
                        .long("fragnet")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Fragnet export JSON"),
                ),
        );

    let matches = cli.get_matches();
    match matches.subcommand() {
        Some(("seed", args)) => seed(args),
        Some(("build", args)) => build(args),
        Some(("validate", args)) => validate(args),
        _ => Ok(()),
    }
}

fn seed(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let activities = load_activities(required_path(args, "activities")?)?;

    let session = FragnetSession::seed(&activities, &config);
    let export = FragnetExport::from_snapshot(&session.editor().store().snapshot());
    println!("{}", export.to_json_pretty()?);
    Ok(())
}

fn build(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let activities = load_activities(required_path(args, "activities")?)?;
    let links_path = required_path(args, "links")?;
    let requests: Vec<LinkRequest> = serde_json::from_str(
        &std::fs::read_to_string(links_path)
            .with_context(|| format!("reading {}", links_path.display()))?,
    )
    .with_context(|| format!("parsing {}", links_path.display()))?;

    let mut session = FragnetSession::seed(&activities, &config);
    for request in &requests {
        let from = resolve(session.editor().store(), &request.from)?;
        let to = resolve(session.editor().store(), &request.to)?;
        // the editor ignores a click on the link source, so reject it here
        if from == to {
            return Err(GraphError::SelfLoop)
                .with_context(|| format!("linking {} -> {}", request.from, request.to));
        }
        let editor = session.editor_mut();
        editor.begin_linking(from)?;
        editor.set_pending_link_type(request.link_type)?;
        editor.set_pending_lag(request.lag_days)?;
        editor
            .click_node(to)
            .with_context(|| format!("linking {} -> {}", request.from, request.to))?;
    }

    let export = match session.save() {
        Ok(export) => export,
        Err(SessionError::ValidationFailed(report)) => {
            for message in report.messages() {
                eprintln!("{message}");
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let json = export.to_json_pretty()?;
    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn validate(args: &ArgMatches) -> anyhow::Result<()> {
    let path = required_path(args, "fragnet")?;
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let export = FragnetExport::from_json(&source)
        .with_context(|| format!("parsing {}", path.display()))?;
    let store = GraphStore::from_export(&export)?;

    let report = Validator::new().validate_store(&store);
    if report.is_valid() {
        println!("valid: {} activities, {} links", store.node_count(), store.link_count());
        return Ok(());
    }
    for message in report.messages() {
        println!("{message}");
    }
    std::process::exit(1);
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing --{name}"))
}

fn load_config(args: &ArgMatches) -> anyhow::Result<FragnetConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => {
            FragnetConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(FragnetConfig::default()),
    }
}

fn load_activities(path: &Path) -> anyhow::Result<Vec<ActivityRecord>> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("parsing {}", path.display()))
}

/// Activity ids are display labels, so the CLI insists on a unique match
fn resolve(store: &GraphStore, activity_id: &str) -> anyhow::Result<NodeId> {
    let mut matches = store.nodes().filter(|n| n.activity_id == activity_id);
    let Some(first) = matches.next() else {
        bail!("no activity with id {activity_id}");
    };
    if matches.next().is_some() {
        bail!("activity id {activity_id} is ambiguous");
    }
    Ok(first.id)
}
