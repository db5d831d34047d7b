//! Metropolitan - browse the Met's public collection from the terminal.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metropolitan::{
    permission::{self, GrantPolicy, Permission, PermissionState, StaticPermissions},
    preferences::Preferences,
    remote::config::DEFAULT_BASE_URL,
    render,
    session::settled,
    ClientConfig, DetailSession, FetchState, GeoCapital, HydrationConfig, MapSession, MetClient,
    Repository, SearchSession, EUROPEAN_CAPITALS,
};

/// Browse the Metropolitan Museum of Art collection.
#[derive(Parser)]
#[command(name = "metropolitan", version, about = "Browse the Metropolitan Museum of Art collection")]
struct Cli {
    /// Collection API root.
    #[arg(long, global = true, env = "MET_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "MET_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Detail requests in flight while hydrating search results.
    #[arg(long, global = true, env = "MET_HYDRATION_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Preferences file.
    #[arg(long, global = true, env = "METROPOLITAN_PREFS")]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List curatorial departments.
    Departments,

    /// Search the collection.
    Search {
        /// Search terms.
        query: Option<String>,

        /// Restrict to a department id.
        #[arg(long)]
        department: Option<i64>,

        /// Include objects without images.
        #[arg(long)]
        without_images: bool,

        /// Repeat the last saved search.
        #[arg(long, conflicts_with_all = ["query", "department"])]
        last: bool,

        /// Maximum number of results to load.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one artwork.
    Show {
        /// Object id.
        id: i64,
    },

    /// List the capitals shown on the map.
    Capitals,

    /// European paintings for a capital on the map.
    Map {
        /// Country, capital or country code.
        place: Option<String>,

        /// Use the capital nearest to `LAT,LON` instead.
        #[arg(long, value_parser = parse_coordinate, conflicts_with = "place", allow_hyphen_values = true)]
        near: Option<(f64, f64)>,

        /// Grant location access to the map.
        #[arg(long, env = "METROPOLITAN_LOCATION")]
        allow_location: bool,
    },

    /// Show or change preferences.
    Prefs {
        /// Set dark mode.
        #[arg(long)]
        dark_mode: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metropolitan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let prefs_path = cli.prefs.clone().unwrap_or_else(Preferences::default_path);

    match &cli.command {
        Commands::Departments => {
            list_departments(repository(&cli, None)?).await?;
        }

        Commands::Search {
            query,
            department,
            without_images,
            last,
            limit,
        } => {
            let request = SearchRequest {
                query: query.clone(),
                department: *department,
                has_images: !without_images,
                last: *last,
            };
            search(repository(&cli, *limit)?, request, &prefs_path).await?;
        }

        Commands::Show { id } => {
            show(repository(&cli, None)?, *id).await?;
        }

        Commands::Capitals => {
            print!("{}", render::capitals_table(&EUROPEAN_CAPITALS));
        }

        Commands::Map {
            place,
            near,
            allow_location,
        } => {
            map(repository(&cli, None)?, place.as_deref(), *near, *allow_location).await?;
        }

        Commands::Prefs { dark_mode } => {
            prefs(&prefs_path, *dark_mode)?;
        }
    }

    Ok(())
}

fn repository(cli: &Cli, search_limit: Option<usize>) -> Result<Repository<MetClient>> {
    let config = ClientConfig::new(cli.api_url.as_str()).with_timeout(Duration::from_secs(cli.timeout_secs));
    let client = MetClient::new(config).context("Failed to build HTTP client")?;

    let mut hydration = HydrationConfig::default().with_concurrency(cli.concurrency);
    if let Some(limit) = search_limit {
        let geo_limit = hydration.geo_limit;
        hydration = hydration.with_limits(geo_limit, limit);
    }

    Ok(Repository::new(client, hydration))
}

fn parse_coordinate(value: &str) -> std::result::Result<(f64, f64), String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{}'", value))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {}", e))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {}", e))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("coordinate out of range: {},{}", lat, lon));
    }
    Ok((lat, lon))
}

/// Wait for a fetch to finish, reporting progress on stderr.
async fn wait_for<T: Clone>(mut rx: watch::Receiver<FetchState<T>>, what: &str) -> Result<T> {
    if rx.borrow().is_loading() {
        eprintln!("Loading {}...", what);
    }

    match settled(&mut rx).await {
        FetchState::Success(value) => Ok(value),
        FetchState::Error(message) => {
            anyhow::bail!("{}\nRun the command again to retry.", message)
        }
        FetchState::Loading => anyhow::bail!("Loading {} was interrupted", what),
    }
}

/// List departments.
async fn list_departments(repo: Repository<MetClient>) -> Result<()> {
    let session = SearchSession::new(repo);
    let departments = wait_for(session.departments(), "departments").await?;

    print!("{}", render::departments_table(&departments));
    Ok(())
}

struct SearchRequest {
    query: Option<String>,
    department: Option<i64>,
    has_images: bool,
    last: bool,
}

/// Run a search and remember it.
async fn search(repo: Repository<MetClient>, request: SearchRequest, prefs_path: &std::path::Path) -> Result<()> {
    let mut prefs = Preferences::load(prefs_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable preferences");
        Preferences::default()
    });

    let session = SearchSession::new(repo);

    let needs_departments = request.department.is_some() || (request.last && prefs.last_department_id().is_some());
    let departments = if needs_departments {
        wait_for(session.departments(), "departments").await?
    } else {
        Vec::new()
    };

    if request.last {
        let restored = prefs.restore_search(&departments);
        session.update_query(restored.query);
        session.update_department(restored.selected_department);
    } else {
        if let Some(query) = request.query {
            session.update_query(query);
        }
        if let Some(id) = request.department {
            let department = departments
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .with_context(|| format!("Unknown department id {}", id))?;
            session.update_department(Some(department));
        }
    }
    session.update_has_images(request.has_images);

    if !session.perform_search() {
        anyhow::bail!("Enter a search term or choose a department");
    }

    let artworks = wait_for(session.results(), "artworks").await?;

    prefs.remember_search(&session.filters());
    if let Err(e) = prefs.save(prefs_path) {
        tracing::warn!(error = %e, "Failed to save preferences");
    }

    if artworks.is_empty() {
        println!("No artworks found.");
        return Ok(());
    }

    print!("{}", render::artworks_table(&artworks));
    println!("{} artworks", artworks.len());
    Ok(())
}

/// Show one artwork.
async fn show(repo: Repository<MetClient>, id: i64) -> Result<()> {
    let session = DetailSession::new(repo);
    session.load(id);

    let artwork = wait_for(session.artwork(), "artwork").await?;
    print!("{}", render::artwork_detail(&artwork));
    Ok(())
}

/// Paintings for a capital, behind the location permission.
async fn map(
    repo: Repository<MetClient>,
    place: Option<&str>,
    near: Option<(f64, f64)>,
    allow_location: bool,
) -> Result<()> {
    let platform = StaticPermissions::desktop(allow_location);
    let flow = permission::resolve(&platform, &Permission::LOCATION, GrantPolicy::Any).await;
    if flow.state() != PermissionState::Granted {
        anyhow::bail!(
            "Location permission required for the map. Pass --allow-location or set METROPOLITAN_LOCATION=true."
        );
    }

    let session = MapSession::new(repo);
    let capital = match (place, near) {
        (_, Some((lat, lon))) => session.select_nearest(lat, lon).context("No network connection")?,
        (Some(name), None) => {
            let capital = *GeoCapital::find(name)
                .with_context(|| format!("'{}' is not on the map; see `metropolitan capitals`", name))?;
            if !session.select_capital(capital) {
                anyhow::bail!("No network connection");
            }
            capital
        }
        (None, None) => anyhow::bail!("Name a capital or pass --near LAT,LON"),
    };

    let artworks = wait_for(session.artworks(), &format!("paintings from {}", capital.country)).await?;

    println!("{} ({})", capital.capital, capital.country);
    if artworks.is_empty() {
        println!("No artworks found.");
        return Ok(());
    }
    print!("{}", render::artworks_table(&artworks));
    Ok(())
}

/// Print preferences, optionally updating them.
fn prefs(path: &std::path::Path, dark_mode: Option<bool>) -> Result<()> {
    let mut prefs = Preferences::load(path)?;

    if let Some(dark_mode) = dark_mode {
        prefs.dark_mode = dark_mode;
        prefs.save(path)?;
    }

    println!("File:            {}", path.display());
    println!("Dark mode:       {}", prefs.dark_mode);
    println!("Last query:      {}", render::or_dash(Some(&prefs.last_search_query)));
    println!(
        "Last department: {}",
        prefs
            .last_department_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}
