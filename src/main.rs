//! bible-chat CLI entry point

use bible_chat::{
    chat::ChatService,
    commands::{
        cmd_chat, cmd_embed, cmd_init, cmd_load, cmd_load_passages, cmd_search, cmd_status,
        cmd_text_search, print_embed_stats, print_load_stats, print_search_results,
        print_status, print_verses, ChatOptions, SearchOptions,
    },
    config::Config,
    error::Result,
    language::{translations_for_language, TRANSLATIONS},
    providers::{create_embedding_provider, create_llm_provider},
    search::SearchService,
    store::ScriptureStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bible-chat")]
#[command(version, about = "Bible-grounded conversational assistant", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and the scripture database
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Load verses or passages from a JSON file
    Load {
        /// Path to the JSON file
        file: PathBuf,

        /// Translation code the verses belong to
        #[arg(short, long, default_value = "web")]
        translation: String,

        /// The file contains curated passages instead of verses
        #[arg(long)]
        passages: bool,
    },

    /// Embed verses and passages that are missing embeddings
    Embed {
        /// Batch size for embedding requests
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Search scripture semantically
    Search {
        /// The search query
        query: String,

        /// Maximum number of verses
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Maximum number of passages
        #[arg(long, default_value = "2")]
        passages: usize,

        /// Minimum similarity score (0-1)
        #[arg(long, default_value = "0.4")]
        threshold: f32,

        /// Restrict to one translation
        #[arg(short, long)]
        translation: Option<String>,

        /// Plain substring search (no embeddings needed)
        #[arg(long)]
        text: bool,
    },

    /// Ask a question and get a scripture-grounded answer
    Chat {
        /// The message to send
        message: String,

        /// Preferred translation (overrides language detection)
        #[arg(short, long)]
        translation: Option<String>,

        /// Answer without retrieving scripture context
        #[arg(long)]
        no_search: bool,

        /// Stream the answer as it is generated
        #[arg(long)]
        stream: bool,

        /// Print the retrieved references after the answer
        #[arg(long)]
        sources: bool,
    },

    /// Look up a verse, optionally with surrounding context
    Verse {
        /// Book name (e.g., "John")
        book: String,
        chapter: i64,
        verse: i64,

        /// Translation code
        #[arg(short, long)]
        translation: Option<String>,

        /// Verses of surrounding context to include
        #[arg(long, default_value = "0")]
        context: i64,
    },

    /// List the canonical books
    Books,

    /// List supported translations
    Translations {
        /// Only translations for this language code (e.g., "it")
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show system status
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    // Init doesn't need an existing database
    if let Commands::Init { force } = cli.command {
        return cmd_init(&config, force).await;
    }

    let store = ScriptureStore::connect(&config).await?;
    if !store.is_initialized().await? {
        return Err(bible_chat::Error::NotInitialized);
    }

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Load {
            file,
            translation,
            passages,
        } => {
            if passages {
                let loaded = cmd_load_passages(&store, &file).await?;
                println!("Loaded {} passages", loaded);
            } else {
                let stats = cmd_load(&store, &file, &translation).await?;
                print_load_stats(&stats, &translation);
            }
        }

        Commands::Embed { batch_size } => {
            let embedder = create_embedding_provider(&config)?;
            let batch_size = batch_size.unwrap_or(config.embedding.batch_size);
            let stats = cmd_embed(&store, embedder, batch_size, !cli.json).await?;
            print_embed_stats(&stats);
        }

        Commands::Search {
            query,
            limit,
            passages,
            threshold,
            translation,
            text,
        } => {
            let embedder = create_embedding_provider(&config)?;
            let search = SearchService::new(
                store,
                embedder,
                config.chat.dedupe_translations,
            );

            if text {
                let verses = cmd_text_search(&search, &query, limit).await?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&verses)?);
                } else {
                    print_verses(&verses);
                }
            } else {
                let options = SearchOptions {
                    max_verses: limit,
                    max_passages: passages,
                    threshold,
                    translation,
                };
                let results = cmd_search(&search, &query, &options).await?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else {
                    print_search_results(&results);
                }
            }
        }

        Commands::Chat {
            message,
            translation,
            no_search,
            stream,
            sources,
        } => {
            let embedder = create_embedding_provider(&config)?;
            let llm = create_llm_provider(&config)?;
            let search = SearchService::new(
                store,
                embedder,
                config.chat.dedupe_translations,
            );
            let service = ChatService::new(search, llm, config);

            let options = ChatOptions {
                translation,
                no_search,
                stream,
                show_sources: sources,
            };
            cmd_chat(&service, &message, &options).await?;
        }

        Commands::Verse {
            book,
            chapter,
            verse,
            translation,
            context,
        } => {
            let embedder = create_embedding_provider(&config)?;
            let search = SearchService::new(store, embedder, false);

            let verses = if context > 0 {
                search.get_context(&book, chapter, verse, context).await?
            } else {
                search
                    .get_verse(&book, chapter, verse, translation.as_deref())
                    .await?
                    .into_iter()
                    .collect()
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&verses)?);
            } else if verses.is_empty() {
                println!("{} {}:{} not found", book, chapter, verse);
            } else {
                print_verses(&verses);
            }
        }

        Commands::Books => {
            let books = store.get_all_books().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&books)?);
            } else {
                for book in books {
                    println!(
                        "{:>2}. {} ({}, {} testament)",
                        book.position, book.name, book.abbreviation, book.testament
                    );
                }
            }
        }

        Commands::Translations { language } => {
            let translations: Vec<_> = match language.as_deref() {
                Some(code) => translations_for_language(code),
                None => TRANSLATIONS.iter().collect(),
            };
            for t in translations {
                let default = if t.is_default { " (default)" } else { "" };
                println!("{:<12} {} - {}{}", t.code, t.name, t.language, default);
            }
        }

        Commands::Status => {
            let embedder = create_embedding_provider(&config)?;
            let llm = create_llm_provider(&config)?;
            let status = cmd_status(&config, &store, llm, embedder).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }
    }

    Ok(())
}
