mod render;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use data_loader::SimilarityStore;
use recommender::{RecommendationPage, Recommender};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tmdb_client::{TmdbClient, TmdbConfig, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::{debug, info};

/// Movie Recommender - content-based recommendations with TMDb metadata
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommend movies similar to the one you pick", long_about = None)]
struct Cli {
    /// Directory holding movielist.dat and cosine_sim{1,2,3}.dat
    #[arg(short, long, env = "MOVIE_RECS_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// TMDb API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TMDb API root
    #[arg(long, env = "TMDB_API_BASE", default_value = DEFAULT_API_BASE_URL)]
    api_base: String,

    /// Prefix for poster image URLs (picks the poster size)
    #[arg(long, env = "TMDB_IMAGE_BASE", default_value = DEFAULT_IMAGE_BASE_URL)]
    image_base: String,

    /// Maximum cached metadata entries (default: number of movies)
    #[arg(long, env = "MOVIE_RECS_CACHE_CAPACITY")]
    cache_capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a movie and the 8 movies most similar to it
    Recommend {
        /// Exact title, as listed by `search`
        #[arg(long)]
        title: String,

        /// Print the page as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List titles available for selection
    Search {
        /// Case-insensitive substring; empty lists everything
        #[arg(long, default_value = "")]
        query: String,

        /// Maximum number of titles to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Read titles from stdin, one per line, and show a page for each
    Interactive {
        /// Print each page as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

const PROMPT: &str = "Select a movie> ";

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so pages on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let store = Arc::new(
        SimilarityStore::load_from_files(&cli.data_dir)
            .context("Failed to load similarity data")?,
    );
    info!("Loaded {} movies in {:?}", store.len(), start.elapsed());

    match &cli.command {
        Commands::Recommend { title, json } => {
            let recommender = build_recommender(&cli, store)?;
            let page = recommender.build_page(title).await;
            print_page(&page, *json)?;
        }
        Commands::Search { query, limit } => handle_search(&store, query, *limit),
        Commands::Interactive { json } => {
            let recommender = build_recommender(&cli, store)?;
            handle_interactive(&recommender, *json).await?;
        }
    }

    Ok(())
}

fn tmdb_config(cli: &Cli) -> Result<TmdbConfig> {
    let api_key = cli
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow!("TMDB_API_KEY is not set (pass --api-key or set the environment variable)"))?;

    Ok(TmdbConfig::new(api_key)
        .with_api_base_url(cli.api_base.clone())
        .with_image_base_url(cli.image_base.clone()))
}

fn build_recommender(cli: &Cli, store: Arc<SimilarityStore>) -> Result<Recommender<TmdbClient>> {
    let config = tmdb_config(cli)?;
    debug!("Using {:?}", config);

    let capacity = cli.cache_capacity.unwrap_or(store.len());
    Ok(Recommender::new(store, TmdbClient::new(config), capacity))
}

fn print_page(page: &RecommendationPage, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(page).context("Failed to serialize page")?;
        println!("{}", out);
    } else {
        print!("{}", render::render_page(page));
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(store: &SimilarityStore, query: &str, limit: usize) {
    let matches = store.search_titles(query);
    print!("{}", render::render_search(&matches, query, limit));
}

/// Prompt until the user enters a title.
///
/// Blank lines prompt again; `quit`, `exit` and end of input yield `None`.
async fn next_selection<R, W>(lines: &mut Lines<R>, prompt: &mut W) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        prompt.write_all(PROMPT.as_bytes()).await?;
        prompt.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read selection")? else {
            return Ok(None);
        };
        match line.trim() {
            "" => continue,
            "quit" | "exit" => return Ok(None),
            title => return Ok(Some(title.to_string())),
        }
    }
}

/// Handle the 'interactive' command
///
/// One recommender serves the whole session, so metadata fetched for one
/// selection is reused by the next.
async fn handle_interactive(recommender: &Recommender<TmdbClient>, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(title) = next_selection(&mut lines, &mut stdout).await? {
        let page = recommender.build_page(&title).await;
        print_page(&page, json)?;

        let stats = recommender.cache_stats();
        debug!(
            "Metadata cache: {} hits, {} misses, {}/{} entries",
            stats.hits, stats.misses, stats.entries, stats.capacity
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend() {
        let cli = Cli::try_parse_from([
            "movie-recs",
            "--data-dir",
            "/tmp/data",
            "--api-key",
            "k",
            "recommend",
            "--title",
            "Avatar",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("/tmp/data"));
        match cli.command {
            Commands::Recommend { title, json } => {
                assert_eq!(title, "Avatar");
                assert!(json);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_build_recommender_requires_key() {
        let cli = Cli::try_parse_from(["movie-recs", "--api-key", " ", "interactive"]).unwrap();
        let store = Arc::new(
            SimilarityStore::new(
                vec![data_loader::MovieRecord::new(1, "A")],
                data_loader::SimilarityMatrix::stack(vec![
                    data_loader::MatrixBlock::from_rows(vec![vec![1.0]]).unwrap(),
                ])
                .unwrap(),
            )
            .unwrap(),
        );

        assert!(build_recommender(&cli, store).is_err());
    }

    #[test]
    fn test_tmdb_config_from_args() {
        let cli = Cli::try_parse_from([
            "movie-recs",
            "--api-key",
            "k",
            "--api-base",
            "http://localhost:8080/3",
            "--image-base",
            "https://image.tmdb.org/t/p/w185",
            "interactive",
        ])
        .unwrap();

        let config = tmdb_config(&cli).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.api_base_url, "http://localhost:8080/3");
        assert_eq!(config.image_base_url, "https://image.tmdb.org/t/p/w185");
    }

    #[tokio::test]
    async fn test_next_selection_skips_blank_lines() {
        let input: &[u8] = b"\n   \n  Avatar  \nSpectre\n";
        let mut lines = input.lines();
        let mut prompts: Vec<u8> = Vec::new();

        let first = next_selection(&mut lines, &mut prompts).await.unwrap();
        assert_eq!(first.as_deref(), Some("Avatar"));
        // One prompt per line read, blanks included
        assert_eq!(prompts, PROMPT.repeat(3).into_bytes());

        let second = next_selection(&mut lines, &mut prompts).await.unwrap();
        assert_eq!(second.as_deref(), Some("Spectre"));

        assert!(next_selection(&mut lines, &mut prompts).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_next_selection_stops_on_quit_and_exit() {
        for input in [&b"quit\nAvatar\n"[..], &b" exit \nAvatar\n"[..]] {
            let mut lines = input.lines();
            let mut prompts: Vec<u8> = Vec::new();

            assert!(next_selection(&mut lines, &mut prompts).await.unwrap().is_none());
        }
    }
}
