//! transdesk client.
//!
//! Translates a text into many languages through a running
//! `transdesk-server`, then lets you review, edit and save the results into
//! the local translation store.
//!
//! ```text
//! transdesk translate --project brochure --file intro.html --review
//! transdesk show --project brochure --language Arabic
//! transdesk projects
//! ```

use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use transdesk::client::render::{display_label, render_terminal};
use transdesk::client::{translate_all, BatchEvent, BatchOptions};
use transdesk::config::{self, DEFAULT_DATABASE, DEFAULT_SERVER_URL};
use transdesk::languages::{self, BATCH_LANGUAGES, SUPPORTED_LANGUAGES};
use transdesk::{ClientError, SaveOutcome, Store, TranslationClient, TranslationSession};

#[derive(Parser)]
#[command(name = "transdesk")]
#[command(about = "Translate text into many languages and keep the results per project", long_about = None)]
#[command(version)]
struct Cli {
    /// Translation server base URL
    #[arg(long, global = true, env = "TRANSDESK_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// SQLite file holding saved translations
    #[arg(long, global = true, env = "TRANSDESK_DATABASE", default_value = DEFAULT_DATABASE)]
    database: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a text into a list of languages, one request per language
    Translate(TranslateArgs),
    /// Translate into the fixed ten-language set with a single request
    Batch(SourceArgs),
    /// Save or update one translation by hand
    Save {
        #[arg(long)]
        project: String,
        #[arg(long)]
        language: String,
        /// Source text the translation belongs to
        #[arg(long, default_value = "")]
        original: String,
        #[arg(long)]
        translation: String,
    },
    /// Show saved translations of a project
    Show {
        #[arg(long)]
        project: String,
        /// Only this language
        #[arg(long)]
        language: Option<String>,
    },
    /// List projects that have saved translations
    Projects,
    /// List supported languages
    Languages,
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "file"])))]
struct SourceArgs {
    /// Text to translate
    #[arg(long)]
    text: Option<String>,

    /// Read the text from a file (`-` for stdin)
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct TranslateArgs {
    #[arg(long)]
    project: String,

    #[command(flatten)]
    source: SourceArgs,

    /// Comma-separated target languages (default: all supported)
    #[arg(long, value_delimiter = ',')]
    languages: Vec<String>,

    /// Requests in flight at once
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Save every translation as it arrives
    #[arg(long)]
    save: bool,

    /// Review, edit and save translations interactively afterwards
    #[arg(long)]
    review: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let timeout = cli.timeout.map(Duration::from_secs);

    match cli.command {
        Commands::Translate(args) => {
            let client = TranslationClient::new(&cli.server, timeout)?;
            let store = open_store(&cli.database)?;
            translate(&client, &store, args).await?
        }
        Commands::Batch(source) => {
            let client = TranslationClient::new(&cli.server, timeout)?;
            batch(&client, source).await?
        }
        Commands::Save {
            project,
            language,
            original,
            translation,
        } => {
            if project.trim().is_empty() || translation.trim().is_empty() {
                bail!("Please enter both project name and translation.");
            }
            let store = open_store(&cli.database)?;
            let outcome = store.save_or_update(&project, &language, &original, &translation)?;
            println!("{}", saved_message(&language, outcome));
        }
        Commands::Show { project, language } => {
            let store = open_store(&cli.database)?;
            show(&store, &project, language.as_deref())?
        }
        Commands::Projects => {
            let store = open_store(&cli.database)?;
            for project in store.list_projects()? {
                println!("{project}");
            }
        }
        Commands::Languages => {
            for language in SUPPORTED_LANGUAGES {
                if languages::is_rtl(language) {
                    println!("{language} (rtl)");
                } else {
                    println!("{language}");
                }
            }
        }
    }

    Ok(())
}

async fn translate(client: &TranslationClient, store: &Store, args: TranslateArgs) -> Result<()> {
    let text = read_source(&args.source)?;
    ensure_inputs(&args.project, &text)?;

    let languages: Vec<&str> = if args.languages.is_empty() {
        SUPPORTED_LANGUAGES.to_vec()
    } else {
        args.languages.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect()
    };

    let mut session = TranslationSession::new(args.project.as_str(), text);
    let options = BatchOptions {
        concurrency: args.concurrency,
    };
    let persist = args.save.then_some(store);

    eprintln!("Translating into {} languages...", languages.len());
    let report = translate_all(client, &mut session, &languages, &options, persist, |event| {
        match event {
            BatchEvent::Translated { language, progress } => {
                eprintln!("[{:>3.0}%] {language}", progress.fraction() * 100.0);
            }
            BatchEvent::Failed {
                language,
                error,
                progress,
            } => match error {
                ClientError::MissingTranslation { .. } => {
                    eprintln!("[{:>3.0}%] {error}.", progress.fraction() * 100.0);
                }
                _ => eprintln!("[{:>3.0}%] {language}: {error}", progress.fraction() * 100.0),
            },
            BatchEvent::Finished { .. } => eprintln!("Translation complete."),
        }
    })
    .await?;

    for (language, outcome) in &report.saved {
        tracing::debug!(language = %language, outcome = ?outcome, "Saved");
    }

    let translated: Vec<String> = session.languages().map(str::to_string).collect();
    for language in &translated {
        print_language(&session, store, language)?;
    }

    if !report.failures.is_empty() {
        eprintln!(
            "{} of {} languages failed: {}",
            report.failures.len(),
            report.progress.total,
            report
                .failures
                .iter()
                .map(|f| f.language.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    if args.review && !session.is_empty() {
        review(&mut session, store)?;
    }
    Ok(())
}

async fn batch(client: &TranslationClient, source: SourceArgs) -> Result<()> {
    let text = read_source(&source)?;
    if text.trim().is_empty() {
        bail!("Please enter text to translate.");
    }

    let result = client.translate_batch(&text).await?;
    let extra: Vec<&str> = result
        .languages()
        .into_iter()
        .filter(|l| !BATCH_LANGUAGES.contains(l))
        .collect();

    for language in BATCH_LANGUAGES.iter().copied().chain(extra) {
        match result.for_language(language) {
            Some(translation) => {
                println!("== {language} ==");
                println!("{}\n", render_terminal(language, translation));
            }
            None => eprintln!("No translation received for {language}."),
        }
    }
    Ok(())
}

fn show(store: &Store, project: &str, language: Option<&str>) -> Result<()> {
    match language {
        Some(language) => match store.get_record(project, language)? {
            Some(record) => {
                let saved_at = record.date_added.format("%Y-%m-%d %H:%M:%S UTC");
                println!("== {} ({saved_at}) ==", record.language);
                println!("{}", render_terminal(&record.language, &record.translation));
            }
            None => bail!("No saved translation for {language} in project '{project}'"),
        },
        None => {
            let rows = store.get_project_translations(project)?;
            if rows.is_empty() {
                bail!("No saved translations for project '{project}'");
            }
            for row in rows {
                println!("== Language: {} ==", row.language);
                println!("{}\n", render_terminal(&row.language, &row.translation));
            }
        }
    }
    Ok(())
}

/// Line-oriented review loop over the session's translations.
fn review(session: &mut TranslationSession, store: &Store) -> Result<()> {
    println!("Commands: list | show <language> | edit <language> | save <language> | quit");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let (command, language) = match line.trim().split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "quit" | "exit" | "q" => break,
            "list" => {
                for language in session.languages() {
                    println!("  {}", display_label(language, session.is_modified(language)));
                }
            }
            "show" if session.get(language).is_some() => print_language(session, store, language)?,
            "edit" if session.get(language).is_some() => {
                println!("Enter the new {language} translation, end with a line containing only '.'");
                let mut edited = Vec::new();
                for line in lines.by_ref() {
                    let line = line?;
                    if line == "." {
                        break;
                    }
                    edited.push(line);
                }
                session.edit(language, edited.join("\n"));
            }
            "save" => match session.save(store, language)? {
                Some(outcome) => println!("{}", saved_message(language, outcome)),
                None => println!("No translation for '{language}' in this session"),
            },
            "show" | "edit" => println!("No translation for '{language}' in this session"),
            other => println!("Unknown command '{other}'"),
        }
    }
    Ok(())
}

fn print_language(session: &TranslationSession, store: &Store, language: &str) -> Result<()> {
    let text = session.display_text(store, language)?.unwrap_or_default();
    println!("== {} ==", display_label(language, session.is_modified(language)));
    println!("{}\n", render_terminal(language, &text));
    Ok(())
}

fn saved_message(language: &str, outcome: SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Inserted => format!("Translation in {language} saved successfully."),
        SaveOutcome::Updated => format!("Translation in {language} updated successfully."),
    }
}

fn ensure_inputs(project: &str, text: &str) -> Result<()> {
    if project.trim().is_empty() || text.trim().is_empty() {
        bail!("Please enter both project name and text to translate.");
    }
    Ok(())
}

fn read_source(source: &SourceArgs) -> Result<String> {
    match (&source.text, &source.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) if path == Path::new("-") => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
            Ok(text)
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => bail!("Provide --text or --file"),
    }
}

fn open_store(path: &Path) -> Result<Store> {
    Store::open(path).with_context(|| format!("Failed to open database at {}", path.display()))
}
