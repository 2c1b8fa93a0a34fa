//! One function per subcommand.

use crate::app::App;
use crate::cli::{CacheCommand, ChurchCommand, ChurchSection, Cli, Command};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;
use std::process::ExitCode;
use verbum_bible::{BIBLE_BOOKS, CACHE_NAMESPACE, Passage, ReadingProgress, TRANSLATIONS};
use verbum_church::{AppData, load_app_data, save_app_data};
use verbum_storage::KeyValueStore;

/// Shown when a passage can't be resolved. The reader can simply try again.
const PASSAGE_UNAVAILABLE: &str = "Não foi possível carregar a passagem agora. Tente novamente.";

pub async fn run(cli: Cli, app: App) -> Result<ExitCode> {
    let json = cli.json;
    match cli.command {
        Command::Passage { query, translation } => {
            let version = app.translation(translation);
            let passage = app.resolver().resolve(&query.join(" "), &version).await;
            // A search result opens its book and chapter, like picking it from the list.
            if let Some(progress) = passage.as_ref().and_then(|p| ReadingProgress::from_passage(p, &version)) {
                remember(&app, &progress).await;
            }
            print_passage(passage.as_ref(), &version, json)
        },
        Command::Chapter { book, chapter, translation } => {
            let version = app.translation(translation);
            // The position moves even if the chapter can't be loaded right now.
            let progress = ReadingProgress { book: book.clone(), chapter, version: version.clone() };
            remember(&app, &progress).await;
            let passage = app.resolver().load_chapter(&book, chapter, &version).await;
            print_passage(passage.as_ref(), &version, json)
        },
        Command::Resume => {
            let progress = ReadingProgress::load(app.store.as_ref()).await.or_raise(|| ErrorKind::Storage)?;
            tracing::info!(book = %progress.book, chapter = progress.chapter, version = %progress.version, "Resuming");
            let passage = app.resolver().load_chapter(&progress.book, progress.chapter, &progress.version).await;
            print_passage(passage.as_ref(), &progress.version, json)
        },
        Command::Context { book, chapter } => print_text(&app.assistant().bible_context(&book, chapter).await, json),
        Command::Ask { question } => print_text(&app.assistant().ask(&question.join(" ")).await, json),
        Command::Summarize { title, speaker } => {
            print_text(&app.assistant().summarize_sermon(&title, &speaker).await, json)
        },
        Command::Pray { intent } => print_text(&app.assistant().prayer(&intent.join(" ")).await, json),
        Command::Church { command } => church(&app, command).await,
        Command::Cache { command } => cache(&app, command, json).await,
        Command::Books => {
            if json {
                return print_json(BIBLE_BOOKS.as_slice());
            }
            let mut out = std::io::stdout().lock();
            for book in BIBLE_BOOKS.iter() {
                writeln!(out, "{:<16} {:>3}  {}", book.name, book.chapters, book.testament).or_raise(|| ErrorKind::Output)?;
            }
            Ok(ExitCode::SUCCESS)
        },
        Command::Translations => {
            if json {
                return print_json(&TRANSLATIONS.iter().map(|t| (t.id, t.name)).collect::<BTreeMap<_, _>>());
            }
            let mut out = std::io::stdout().lock();
            for translation in TRANSLATIONS.iter() {
                writeln!(out, "{:<4} {}", translation.id, translation.name).or_raise(|| ErrorKind::Output)?;
            }
            Ok(ExitCode::SUCCESS)
        },
    }
}

async fn remember(app: &App, progress: &ReadingProgress) {
    if let Err(err) = progress.save(app.store.as_ref()).await {
        tracing::warn!(error = ?err, "Could not save reading position");
    }
}

async fn church(app: &App, command: ChurchCommand) -> Result<ExitCode> {
    match command {
        ChurchCommand::Show { section } => {
            let data = load_app_data(app.store.as_ref()).await.or_raise(|| ErrorKind::Storage)?;
            match section {
                ChurchSection::Config => print_json(&data.config),
                ChurchSection::Events => print_json(&data.events),
                ChurchSection::Sermons => print_json(&data.sermons),
                ChurchSection::Gallery => print_json(&data.gallery),
                ChurchSection::Cells => print_json(&data.cells),
            }
        },
        ChurchCommand::Import { path } => {
            let raw = tokio::fs::read_to_string(&path).await.or_raise(|| ErrorKind::Input(path.clone()))?;
            let data = AppData::from_json(&raw).or_raise(|| ErrorKind::Input(path.clone()))?;
            save_app_data(app.store.as_ref(), &data).await.or_raise(|| ErrorKind::Storage)?;
            tracing::info!(path = %path.display(), events = data.events.len(), cells = data.cells.len(), "Imported church data");
            Ok(ExitCode::SUCCESS)
        },
    }
}

async fn cache(app: &App, command: CacheCommand, json: bool) -> Result<ExitCode> {
    match command {
        CacheCommand::List => {
            let keys = app.store.keys(Some(CACHE_NAMESPACE)).await.or_raise(|| ErrorKind::Storage)?;
            if json {
                return print_json(&keys);
            }
            let mut out = std::io::stdout().lock();
            for key in keys {
                writeln!(out, "{key}").or_raise(|| ErrorKind::Output)?;
            }
            Ok(ExitCode::SUCCESS)
        },
        CacheCommand::Show { key } => {
            let Some(raw) = app.store.get(&key).await.or_raise(|| ErrorKind::Storage)? else {
                eprintln!("Nada guardado em {key}.");
                return Ok(ExitCode::FAILURE);
            };
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => print_json(&value),
                Err(_) => print_text(&raw, false),
            }
        },
    }
}

fn print_passage(passage: Option<&Passage>, version: &str, json: bool) -> Result<ExitCode> {
    let Some(passage) = passage else {
        eprintln!("{PASSAGE_UNAVAILABLE}");
        return Ok(ExitCode::FAILURE);
    };
    if json {
        return print_json(passage);
    }
    let mut out = std::io::stdout().lock();
    writeln!(out, "{} ({version})\n", passage.reference).or_raise(|| ErrorKind::Output)?;
    for verse in &passage.verses {
        writeln!(out, "{:>3} {}", verse.num, verse.text).or_raise(|| ErrorKind::Output)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn print_text(text: &str, json: bool) -> Result<ExitCode> {
    if json {
        return print_json(&serde_json::json!({ "text": text }));
    }
    writeln!(std::io::stdout().lock(), "{text}").or_raise(|| ErrorKind::Output)?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<ExitCode> {
    let rendered = serde_json::to_string_pretty(value).or_raise(|| ErrorKind::Output)?;
    writeln!(std::io::stdout().lock(), "{rendered}").or_raise(|| ErrorKind::Output)?;
    Ok(ExitCode::SUCCESS)
}
