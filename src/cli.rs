use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "verbum", version, about = "Bible passages and pastoral help for the church community")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, global = true, env = "VERBUM_CONFIG")]
    pub config: Option<PathBuf>,
    /// Behave as if there were no network: only cached passages are available.
    #[arg(long, global = true)]
    pub offline: bool,
    /// Never write to device storage.
    #[arg(long, global = true)]
    pub read_only: bool,
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    /// More logging (repeatable). Ignored when RUST_LOG is set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a reference ("Jo 3", "Salmos 23:1-6") or a theme ("ansiedade").
    Passage {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(short, long)]
        translation: Option<String>,
    },
    /// Read a whole chapter and remember it as the reading position.
    Chapter {
        book: String,
        chapter: u32,
        #[arg(short, long)]
        translation: Option<String>,
    },
    /// Reopen the last chapter read.
    Resume,
    /// Historical and spiritual background of a chapter.
    Context { book: String, chapter: u32 },
    /// Ask a question about the Scriptures.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Summarize a sermon from its title and speaker.
    Summarize { title: String, speaker: String },
    /// Write a short prayer for an intention.
    Pray {
        #[arg(required = true, num_args = 1..)]
        intent: Vec<String>,
    },
    /// Church information.
    Church {
        #[command(subcommand)]
        command: ChurchCommand,
    },
    /// Inspect cached passages.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// List the books of the Bible.
    Books,
    /// List the known translations.
    Translations,
}

#[derive(Debug, Subcommand)]
pub enum ChurchCommand {
    /// Print one section as JSON.
    Show {
        #[arg(value_enum, default_value_t = ChurchSection::Config)]
        section: ChurchSection,
    },
    /// Replace the church data with a JSON document; missing parts get the defaults.
    Import { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChurchSection {
    Config,
    Events,
    Sermons,
    Gallery,
    Cells,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// List cached passage keys.
    List,
    /// Print a cached passage by key.
    Show { key: String },
}
