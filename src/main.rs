use anyhow::Result;
use castdeck::app::{self, App};
use castdeck::audio::{AudioBackend, NullBackend, StreamingBackend};
use castdeck::catalog::Catalog;
use castdeck::filter::FilterCriteria;
use castdeck::opener::SystemOpener;
use castdeck::playback::PlaybackController;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "castdeck", version)]
#[command(about = "Browse and play the featured podcast catalog from the terminal")]
struct Cli {
    /// Start with this category chip selected
    #[arg(long)]
    category: Option<String>,

    /// Start with this search query
    #[arg(long)]
    query: Option<String>,

    /// Print the catalog as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Run without audio output
    #[arg(long)]
    mute: bool,

    /// Where to write the log (stdout belongs to the UI)
    #[arg(long, default_value = "castdeck.log")]
    log_file: PathBuf,
}

fn setup_logging(path: &PathBuf) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(fern::log_file(path)?)
        .apply()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = Catalog::builtin();

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(catalog.list())?);
        return Ok(());
    }

    setup_logging(&cli.log_file)?;
    log::info!("castdeck starting with {} catalog entries", catalog.list().len());

    let mut criteria = FilterCriteria::default();
    if let Some(category) = cli.category {
        if !catalog.categories().contains(&category) {
            anyhow::bail!(
                "unknown category '{}' (available: {})",
                category,
                catalog.categories().join(", ")
            );
        }
        criteria.category = category;
    }
    if let Some(query) = cli.query {
        criteria.query = query;
    }

    let backend: Box<dyn AudioBackend> = if cli.mute {
        Box::new(NullBackend::new())
    } else {
        Box::new(StreamingBackend::new())
    };
    let player = PlaybackController::new(backend);

    let app = App::new(catalog, criteria, player, Box::new(SystemOpener));
    app::start_ui(app).await
}
