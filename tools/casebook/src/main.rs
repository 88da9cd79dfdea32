use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use casebook_core::catalog::model::CitationRecord;
use casebook_core::catalog::render::{render_catalog_text, CatalogView};
use casebook_core::config::CatalogConfig;
use casebook_core::loader::{load_catalog, load_citations};
use casebook_core::reconcile::export::write_merged_file;
use casebook_core::reconcile::validate::describe_problems;
use casebook_core::session::{BulkEditSession, CatalogSession};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "casebook")]
#[command(about = "Browse and bulk-edit the breach citation catalog")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Filter the catalog by breach tag and keyword.
    List(ListArgs),
    /// Print the breach tag dropdown entries.
    Tags,
    /// Check a staged batch against the current catalog.
    Validate(StageArgs),
    /// Merge a staged batch and write the result for commit.
    Merge(MergeArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    tag: Option<String>,
    #[arg(long)]
    keyword: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    Json,
    Csv,
}

#[derive(Debug, Args)]
struct StageArgs {
    #[arg(long)]
    input: PathBuf,
    /// Defaults to csv for *.csv inputs, json otherwise.
    #[arg(long, value_enum)]
    format: Option<InputFormat>,
    /// Let staged records overwrite existing ids.
    #[arg(long, overrides_with = "no_allow_updates")]
    allow_updates: bool,
    /// Refuse existing ids even if the config allows updates.
    #[arg(long, overrides_with = "allow_updates")]
    no_allow_updates: bool,
}

impl StageArgs {
    /// The flags win over the config in both directions.
    fn allow_updates(&self, config: &CatalogConfig) -> bool {
        if self.allow_updates {
            true
        } else if self.no_allow_updates {
            false
        } else {
            config.allow_updates
        }
    }
}

#[derive(Debug, Args)]
struct MergeArgs {
    #[command(flatten)]
    stage: StageArgs,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write even when validation reports problems.
    #[arg(long)]
    force: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => CatalogConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::List(args) => list(&config, &args),
        Command::Tags => tags(&config),
        Command::Validate(args) => validate(&config, &args),
        Command::Merge(args) => merge(&config, &args),
    }
}

fn list(config: &CatalogConfig, args: &ListArgs) -> Result<ExitCode> {
    let mut session = CatalogSession::new();
    session.apply_load(load_catalog(&config.catalog_paths()));
    session.set_tag(args.tag.as_deref());
    session.set_keyword(args.keyword.as_deref().unwrap_or_default());

    let view = session.view();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_catalog_text(&view));
    }
    Ok(match view {
        CatalogView::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

fn tags(config: &CatalogConfig) -> Result<ExitCode> {
    let mut session = CatalogSession::new();
    session.apply_load(load_catalog(&config.catalog_paths()));
    for option in session.tag_options() {
        println!("{}\t{}", option.value, option.label);
    }
    Ok(ExitCode::SUCCESS)
}

fn stage_session(config: &CatalogConfig, args: &StageArgs) -> Result<BulkEditSession> {
    let current: Vec<CitationRecord> = load_citations(config.citations_path())?;
    let mut session = BulkEditSession::new(current);
    session.set_allow_updates(args.allow_updates(config));

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading staged input {}", args.input.display()))?;
    let format = args.format.unwrap_or_else(|| {
        let is_csv = args
            .input
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            InputFormat::Csv
        } else {
            InputFormat::Json
        }
    });
    let staged = match format {
        InputFormat::Json => session.stage_json(&text),
        InputFormat::Csv => session.stage_delimited(&text),
    }
    .with_context(|| format!("parsing staged input {}", args.input.display()))?;
    tracing::info!(staged, "staged incoming citations");
    Ok(session)
}

fn report_problems(problems: &[String]) {
    for line in problems {
        println!("PROBLEM {}", line);
    }
}

fn validate(config: &CatalogConfig, args: &StageArgs) -> Result<ExitCode> {
    let mut session = stage_session(config, args)?;
    let problems = describe_problems(&session.validate());
    if problems.is_empty() {
        println!("OK {} record(s) ready to merge", session.incoming().len());
        return Ok(ExitCode::SUCCESS);
    }
    report_problems(&problems);
    println!("FAIL {} problem(s)", problems.len());
    Ok(ExitCode::FAILURE)
}

fn merge(config: &CatalogConfig, args: &MergeArgs) -> Result<ExitCode> {
    let mut session = stage_session(config, &args.stage)?;
    let problems = describe_problems(&session.validate());
    if !problems.is_empty() {
        report_problems(&problems);
        if !args.force {
            println!("FAIL {} problem(s); nothing written", problems.len());
            return Ok(ExitCode::FAILURE);
        }
        tracing::warn!(problems = problems.len(), "writing despite validation problems");
    }

    let outcome = session.merge();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.merged_output_path());
    let report = write_merged_file(&output, &outcome.records)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "MERGED added={} updated={} ignored={} total={}",
        outcome.added, outcome.updated, outcome.ignored, report.record_count
    );
    println!("WROTE {} sha256={}", report.path.display(), report.sha256);
    Ok(ExitCode::SUCCESS)
}
