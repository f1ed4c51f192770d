use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use shopfeed::config::Config;
use shopfeed::feed::FeedAssembler;
use shopfeed::storage::Database;
use shopfeed::util::validate_store_url;

/// Get the config directory path (~/.config/shopfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("shopfeed"))
}

/// Atomically write `content` to `dst` using write-to-temp-then-rename.
/// Crawlers fetching the feed never see a half-written file.
fn atomic_write(dst: &Path, content: &[u8]) -> Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions",
                temp_path.display()
            )
        })?;

    file.write_all(content).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to write feed to temporary file '{}'",
            temp_path.display()
        )
    })?;

    file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to sync temporary file '{}' to disk",
            temp_path.display()
        )
    })?;

    drop(file);

    std::fs::rename(&temp_path, dst).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to rename '{}' to '{}'",
            temp_path.display(),
            dst.display()
        )
    })?;

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "shopfeed", about = "Generate a Google Shopping RSS feed for a store")]
struct Args {
    /// Config file (defaults to ~/.config/shopfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite catalog database
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Code of the store to export
    #[arg(long, value_name = "CODE")]
    store: Option<String>,

    /// Write the feed to FILE instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays a clean XML stream
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let db_path = args.db.unwrap_or(config.database);
    let store_code = args.store.or(config.store).context(
        "No store selected: pass --store CODE or set `store` in the config file",
    )?;
    let output = args.output.or(config.output);

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = Database::open(db_path_str)
        .await
        .with_context(|| format!("Failed to open catalog {}", db_path.display()))?;

    let store = db
        .get_store_by_code(&store_code)
        .await
        .context("Failed to look up store")?
        .with_context(|| format!("No store with code '{}' in {}", store_code, db_path.display()))?;

    if let Err(e) = validate_store_url(&store.url) {
        tracing::warn!(
            store = %store.code,
            url = %store.url,
            error = %e,
            "Store URL will produce links crawlers cannot follow"
        );
    }

    let setting = match db
        .get_feed_setting(store.id)
        .await
        .context("Failed to load feed settings")?
    {
        Some(setting) => setting,
        None => {
            tracing::debug!(store = %store.code, "No saved feed settings, using config defaults");
            config.feed
        }
    };

    let snapshot = db
        .load_catalog(&store)
        .await
        .with_context(|| format!("Failed to load catalog for store '{}'", store.code))?;

    let xml = FeedAssembler::new(&snapshot)
        .generate(&store, &setting)
        .context("Failed to generate feed")?;

    match output {
        Some(path) => {
            atomic_write(&path, xml.as_bytes())?;
            tracing::info!(path = %path.display(), "Wrote feed");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", xml).context("Failed to write feed to stdout")?;
        }
    }

    Ok(())
}
