mod display;
mod notice;

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use consumershield_ai::{
    AnalysisConfig, Analyzer, CredentialSource, DEFAULT_ANALYSIS_MODEL, DEFAULT_ENDPOINT,
    DEFAULT_TRANSLATION_MODEL, GeminiProvider, Translator,
};
use consumershield_core::{SupportedLanguage, validate_intake};
use consumershield_store::{Archive, CaseArchive, FileStore, StoreError, TranslationCache};
use tracing_subscriber::EnvFilter;

use notice::NoticeSession;

#[derive(Parser)]
#[command(
    name = "consumershield",
    version,
    about = "Build a consumer-complaint strategy from your own legal documents"
)]
struct Cli {
    /// Directory holding saved cases and cached translations.
    #[arg(long, env = "CONSUMERSHIELD_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the generative-language API.
    #[arg(
        long,
        env = "CONSUMERSHIELD_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        global = true
    )]
    endpoint: String,

    /// Model used for case analysis.
    #[arg(
        long,
        env = "CONSUMERSHIELD_MODEL",
        default_value = DEFAULT_ANALYSIS_MODEL,
        global = true
    )]
    model: String,

    /// Model used for notice translation.
    #[arg(
        long,
        env = "CONSUMERSHIELD_TRANSLATION_MODEL",
        default_value = DEFAULT_TRANSLATION_MODEL,
        global = true
    )]
    translation_model: String,

    /// Abort provider requests after this many seconds. No limit by default.
    #[arg(long, env = "CONSUMERSHIELD_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a complaint against reference documents and save the strategy.
    Analyze {
        /// Description of the grievance.
        #[arg(
            long,
            conflicts_with = "complaint_file",
            required_unless_present = "complaint_file"
        )]
        complaint: Option<String>,
        /// Read the complaint from a file.
        #[arg(long)]
        complaint_file: Option<PathBuf>,
        /// An Act, judgment, or evidence file (PDF, image, text). Repeatable.
        #[arg(long = "doc")]
        docs: Vec<PathBuf>,
        /// Print the strategy without saving it.
        #[arg(long)]
        no_save: bool,
    },
    /// Manage saved cases.
    Cases {
        #[command(subcommand)]
        action: CasesCommand,
    },
    /// Print the draft legal notice of a saved case.
    Notice {
        id: String,
        /// Language to render the notice in.
        #[arg(long, default_value_t = SupportedLanguage::BASE)]
        lang: SupportedLanguage,
    },
    /// List languages the notice can be translated into.
    Languages,
}

#[derive(Subcommand)]
enum CasesCommand {
    /// List saved cases, newest first.
    List,
    /// Show the full strategy of one case.
    Show { id: String },
    /// Delete one case.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AnalysisConfig {
        endpoint: cli.endpoint.clone(),
        analysis_model: cli.model.clone(),
        translation_model: cli.translation_model.clone(),
        timeout: cli.timeout_secs.map(Duration::from_secs),
    };
    let data_dir = resolve_data_dir(cli.data_dir)?;
    tracing::info!(
        data_dir = %data_dir.display(),
        "consumershield v{}",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Command::Analyze {
            complaint,
            complaint_file,
            docs,
            no_save,
        } => {
            let complaint = match (complaint, complaint_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading complaint from {}", path.display()))?,
                (None, None) => {
                    anyhow::bail!("either --complaint or --complaint-file is required")
                }
            };
            let docs = dedupe_documents(docs);
            cmd_analyze(&config, &data_dir, &complaint, &docs, no_save).await
        }
        Command::Cases { action } => {
            let archive = open_archive(&data_dir)?;
            cmd_cases(&archive, action)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Notice { id, lang } => {
            cmd_notice(&config, &data_dir, &id, lang).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Languages => {
            display::print_languages()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|d| d.join("consumershield"))
            .context("no platform data directory; pass --data-dir"),
    }
}

fn open_archive(data_dir: &Path) -> anyhow::Result<CaseArchive<FileStore>> {
    let store = FileStore::open(data_dir)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    Ok(CaseArchive::new(store))
}

// ── Commands ──

async fn cmd_analyze(
    config: &AnalysisConfig,
    data_dir: &Path,
    complaint: &str,
    docs: &[PathBuf],
    no_save: bool,
) -> anyhow::Result<ExitCode> {
    if let Err(e) = validate_intake(complaint, docs.len()) {
        eprintln!("{}", capitalise(&e.to_string()));
        return Ok(ExitCode::FAILURE);
    }

    let provider = GeminiProvider::new(config).context("building HTTP client")?;
    let analyzer = Analyzer::new(provider, CredentialSource::Environment, config);

    eprintln!("Analysing {} document(s)...", docs.len());
    let record = match analyzer.analyze(complaint.trim(), docs).await {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{}", e.user_message());
            if e.is_unauthenticated() {
                eprintln!("Set API_KEY or GEMINI_API_KEY to a valid key and try again.");
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    display::print_strategy_card(&record)?;

    if no_save {
        return Ok(ExitCode::SUCCESS);
    }
    let archive = open_archive(data_dir)?;
    let saved = archive.save(complaint.trim(), record).context("saving case")?;
    println!("Saved as case {}", saved.id);
    Ok(ExitCode::SUCCESS)
}

fn cmd_cases(archive: &impl Archive, action: CasesCommand) -> anyhow::Result<()> {
    match action {
        CasesCommand::List => {
            let cases = archive.list().context("reading case archive")?;
            display::print_case_list(&cases)?;
        }
        CasesCommand::Show { id } => {
            let case = archive.get(&id).map_err(not_found_hint)?;
            println!("Complaint: {}", case.complaint);
            println!();
            display::print_strategy_card(&case.result)?;
        }
        CasesCommand::Delete { id } => {
            let deletion = archive.delete(&id).context("deleting case")?;
            if deletion.removed {
                println!("Deleted {id}. {} case(s) remain.", deletion.remaining.len());
            } else {
                eprintln!("No case with id {id}.");
            }
        }
    }
    Ok(())
}

async fn cmd_notice(
    config: &AnalysisConfig,
    data_dir: &Path,
    id: &str,
    language: SupportedLanguage,
) -> anyhow::Result<()> {
    let store = Arc::new(
        FileStore::open(data_dir)
            .with_context(|| format!("opening data directory {}", data_dir.display()))?,
    );
    let archive = CaseArchive::new(Arc::clone(&store));
    let case = archive.get(id).map_err(not_found_hint)?;

    let provider = GeminiProvider::new(config).context("building HTTP client")?;
    let translator = Translator::new(provider, CredentialSource::Environment, config);
    let session = NoticeSession::new(translator, TranslationCache::new(store));

    let text = session
        .render(&case.id, &case.result.draft_notice_text, language)
        .await;
    println!("{text}");
    Ok(())
}

// ── Helpers ──

/// Drop repeated document paths, keeping the first occurrence of each.
fn dedupe_documents(docs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let before = docs.len();
    let unique: Vec<PathBuf> = docs.into_iter().filter(|d| seen.insert(d.clone())).collect();
    if unique.len() < before {
        tracing::warn!(
            dropped = before - unique.len(),
            "ignoring documents attached more than once"
        );
    }
    unique
}

fn not_found_hint(e: StoreError) -> anyhow::Error {
    match e {
        StoreError::CaseNotFound(id) => {
            anyhow::anyhow!("no case with id {id} (see `consumershield cases list`)")
        }
        other => anyhow::Error::new(other).context("reading case archive"),
    }
}

fn capitalise(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}
