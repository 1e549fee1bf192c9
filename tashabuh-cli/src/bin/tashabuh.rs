use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tashabuh_corpus::{load_corpus, JuzRange, Verse};
use tashabuh_import::{load_matches, run_import};
use tashabuh_pipeline::{build_phrases, PhraseConfig};
use tashabuh_store::JsonlStore;
use tashabuh_text::QuranNormalizer;

#[derive(Debug, Parser)]
#[command(
    name = "tashabuh",
    about = "Offline builder for the mutashabihat phrase index"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct CorpusArgs {
    /// Directory holding the Quran metadata JSON files
    #[arg(long, env = "TASHABUH_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Output directory for the phrase store
    #[arg(long, env = "TASHABUH_OUT_DIR", default_value = "./phrases")]
    out_dir: PathBuf,

    /// First juz of the corpus scope
    #[arg(long, default_value_t = 1)]
    juz_from: u32,

    /// Last juz of the corpus scope, inclusive
    #[arg(long, default_value_t = 4)]
    juz_to: u32,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover repeated phrases by n-gram extraction and rebuild the store
    BuildPhrases {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Minimum n-gram length in words
        #[arg(long, default_value_t = 3)]
        min_n: usize,

        /// Maximum n-gram length in words
        #[arg(long, default_value_t = 7)]
        max_n: usize,

        /// Minimum occurrence count to keep a phrase
        #[arg(long, default_value_t = 2)]
        min_freq: usize,

        /// Maximum occurrence count to keep a phrase
        #[arg(long, default_value_t = 60)]
        max_freq: usize,
    },
    /// Rebuild the store from a pre-computed matching-ayah list
    ImportMatches {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let normalizer = QuranNormalizer::new();

    match cli.command {
        Commands::BuildPhrases {
            corpus,
            min_n,
            max_n,
            min_freq,
            max_freq,
        } => {
            let config = PhraseConfig {
                min_n,
                max_n,
                min_freq,
                max_freq,
            };
            let verses = load_scope(&corpus)?;
            let mut store = open_store(&corpus)?;
            let summary = build_phrases(&verses, &normalizer, &config, &mut store)
                .context("building phrase index")?;
            store.flush().context("flushing phrase store")?;
            println!(
                "Built phrases: {}, occurrences: {}",
                summary.phrases, summary.occurrences
            );
        }
        Commands::ImportMatches { corpus } => {
            let matches = load_matches(&corpus.data_dir.join("matching-ayah.json"))
                .context("loading matching-ayah.json")?;
            let verses = load_scope(&corpus)?;
            let mut store = open_store(&corpus)?;
            let summary = run_import(&verses, &matches, &normalizer, &mut store)
                .context("importing match list")?;
            store.flush().context("flushing phrase store")?;
            println!(
                "Imported phrases: {}, occurrences: {}",
                summary.phrases, summary.occurrences
            );
        }
    }

    Ok(())
}

fn load_scope(corpus: &CorpusArgs) -> anyhow::Result<Vec<Verse>> {
    let range = JuzRange::new(corpus.juz_from, corpus.juz_to);
    let verses = load_corpus(
        &corpus.data_dir.join("quran-metadata-ayah.json"),
        &corpus.data_dir.join("quran-metadata-juz.json"),
        range,
    )
    .with_context(|| format!("loading corpus for juz {}..={}", range.from, range.to))?;
    info!(verses = verses.len(), "corpus loaded");
    Ok(verses)
}

fn open_store(corpus: &CorpusArgs) -> anyhow::Result<JsonlStore> {
    JsonlStore::open(&corpus.out_dir)
        .with_context(|| format!("opening phrase store at {}", corpus.out_dir.display()))
}
