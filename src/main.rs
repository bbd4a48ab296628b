use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use filmshelf::catalog::{poster_url, MovieCatalog, MovieId, MovieSummary, TmdbClient};
use filmshelf::config::Config;
use filmshelf::details::{load_details, DetailsState};
use filmshelf::favorites::{FavoritesStore, FavoritesSync};
use filmshelf::logging::init_tracing;
use filmshelf::search::{SearchCoordinator, SearchState, SearchStatus};
use filmshelf::storage::FileStore;

#[derive(Parser)]
#[command(name = "filmshelf", version, about = "Browse, search and favorite movies")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List popular movies.
    Popular,
    /// Search the catalog once.
    Search { query: String },
    /// Show one movie.
    Details { id: MovieId },
    /// Manage favorites.
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Search as you type: each stdin line replaces the query, an empty
    /// line clears it and browses popular movies.
    Interactive,
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// Print the favorites set.
    List,
    /// Add or remove a movie by id.
    Toggle { id: MovieId },
    /// Print the set every time another process changes it.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;
    let catalog: Arc<dyn MovieCatalog> =
        Arc::new(TmdbClient::new(&config.catalog).context("failed to build catalog client")?);

    match cli.command {
        Command::Popular => print_movies(&catalog.fetch_popular().await?, &config),
        Command::Search { query } => print_movies(&catalog.search(&query).await?, &config),
        Command::Details { id } => print_details(load_details(catalog.as_ref(), id).await)?,
        Command::Favorites(cmd) => run_favorites(cmd, &config, catalog.as_ref()).await?,
        Command::Interactive => run_interactive(catalog, &config).await?,
    }
    Ok(())
}

fn open_favorites(config: &Config, watched: bool) -> Result<FavoritesStore> {
    let dir = config.favorites.resolved_data_dir();
    let opened = if watched {
        FileStore::open_watched(&dir, config.search.debounce())
    } else {
        FileStore::open(&dir)
    };
    let store =
        opened.with_context(|| format!("failed to open favorites store at {}", dir.display()))?;
    Ok(FavoritesStore::new(Arc::new(store), config.favorites.key.clone()))
}

async fn run_favorites(
    cmd: FavoritesCommand,
    config: &Config,
    catalog: &dyn MovieCatalog,
) -> Result<()> {
    match cmd {
        FavoritesCommand::List => {
            let favorites = open_favorites(config, false)?;
            print_movies(&favorites.list(), config);
        }
        FavoritesCommand::Toggle { id } => {
            let favorites = open_favorites(config, false)?;
            let movie = match favorites.list().into_iter().find(|m| m.id == id) {
                Some(movie) => movie,
                None => match load_details(catalog, id).await {
                    DetailsState::Loaded(details) => details.summary,
                    DetailsState::NotFound => bail!("movie {} not found", id),
                    DetailsState::Failed(err) => return Err(err.into()),
                    DetailsState::Loading => bail!("movie {} did not load", id),
                },
            };
            let title = movie.title.clone();
            if favorites.toggle(movie)? {
                println!("♥ added {} ({})", title, id);
            } else {
                println!("♡ removed {} ({})", title, id);
            }
        }
        FavoritesCommand::Watch => {
            let favorites = Arc::new(open_favorites(config, true)?);
            let _sync = FavoritesSync::spawn(Arc::clone(&favorites));
            let mut updates = favorites.subscribe();
            print_movies(&favorites.list(), config);
            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        println!("--");
                        let movies = updates.borrow_and_update().movies().to_vec();
                        print_movies(&movies, config);
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }
    Ok(())
}

async fn run_interactive(catalog: Arc<dyn MovieCatalog>, config: &Config) -> Result<()> {
    let coordinator = SearchCoordinator::new(catalog, &config.search);
    let mut updates = coordinator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    coordinator.submit();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => LineAction::from_line(line).apply(&coordinator),
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_state(&state, config);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    coordinator.dispose();
    Ok(())
}

/// What one line of interactive input does.
#[derive(Debug, PartialEq)]
enum LineAction {
    /// Clear the query and fetch popular movies right away.
    Browse,
    /// Replace the query; the debounce decides when it runs.
    Edit(String),
}

impl LineAction {
    fn from_line(line: String) -> Self {
        if line.trim().is_empty() {
            Self::Browse
        } else {
            Self::Edit(line)
        }
    }

    fn apply(self, coordinator: &SearchCoordinator) {
        match self {
            Self::Browse => {
                coordinator.set_query("");
                coordinator.submit();
            }
            Self::Edit(query) => coordinator.set_query(query),
        }
    }
}

fn print_state(state: &SearchState, config: &Config) {
    match state.status {
        SearchStatus::Idle => {}
        SearchStatus::Loading => println!("… loading \"{}\"", state.query),
        SearchStatus::Ready => print_movies(&state.results, config),
        SearchStatus::Failed => {
            if let Some(err) = &state.last_error {
                println!("! {} (showing previous results)", err);
            }
        }
    }
}

fn print_movies(movies: &[MovieSummary], config: &Config) {
    if movies.is_empty() {
        println!("(no movies)");
        return;
    }
    for movie in movies {
        let year = movie.release_year().unwrap_or("----");
        let poster = movie
            .poster_path
            .as_deref()
            .map(|p| poster_url(&config.catalog.image_base_url, p))
            .unwrap_or_default();
        println!("{:>8}  {}  {}  {}", movie.id, year, movie.title, poster);
    }
}

fn print_details(state: DetailsState) -> Result<()> {
    match state {
        DetailsState::Loaded(details) => {
            let summary = &details.summary;
            println!("{} ({})", summary.title, summary.release_date.as_deref().unwrap_or("unknown"));
            println!("⭐ {:.1}", details.vote_average);
            let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
            if !genres.is_empty() {
                println!("{}", genres.join(", "));
            }
            println!();
            println!("{}", details.overview);
            if let Some(homepage) = details.homepage.as_deref().filter(|h| !h.is_empty()) {
                println!();
                println!("{}", homepage);
            }
            Ok(())
        }
        DetailsState::NotFound => bail!("Movie not found"),
        DetailsState::Failed(err) => Err(err.into()),
        DetailsState::Loading => Ok(()),
    }
}
