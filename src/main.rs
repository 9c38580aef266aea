use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use channel_reels::config::Config;
use channel_reels::feed::ChannelFeed;
use channel_reels::ui::{format_channel, format_video_list};

#[derive(Parser, Debug)]
#[command(name = "channel-reels")]
#[command(about = "YouTube channel feed for the podcast site", version)]
struct Cli {
    /// Ignore cached entries and fetch from the API
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Channel metadata and statistics
    Channel,
    /// Latest long-form videos
    Videos {
        /// Uploads to look at (1-50, defaults to MAX_RESULTS)
        #[arg(short, long)]
        max: Option<u32>,
    },
    /// Latest reels (short-form videos)
    Reels {
        #[arg(short, long)]
        max: Option<u32>,
    },
    /// Channel, videos and reels
    All {
        #[arg(short, long)]
        max: Option<u32>,
    },
    /// Inspect or clear the cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Validate configuration and print a summary
    CheckConfig,
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    Stats,
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("channel_reels=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Cargar configuración
    let config = Config::load()?;
    let feed = ChannelFeed::from_config(&config)?;

    if !feed.client().is_configured() {
        warn!("⚠️ Sin credenciales de YouTube: solo se servirá la caché");
    }

    match cli.command {
        Command::Channel => print_channel(&feed, cli.refresh).await,
        Command::Videos { max } => {
            let max = max.unwrap_or(config.max_results);
            let videos = feed.long_form(max, cli.refresh).await;
            print!("{}", format_video_list("🎙️ Videos", &videos));
        }
        Command::Reels { max } => {
            let max = max.unwrap_or(config.max_results);
            let reels = feed.short_form(max, cli.refresh).await;
            print!("{}", format_video_list("🎬 Reels", &reels));
        }
        Command::All { max } => {
            let max = max.unwrap_or(config.max_results);
            print_channel(&feed, cli.refresh).await;
            println!();
            print!("{}", format_video_list("🎙️ Videos", &feed.long_form(max, cli.refresh).await));
            println!();
            // misma búsqueda: los reels ya quedaron en caché
            print!("{}", format_video_list("🎬 Reels", &feed.short_form(max, false).await));
        }
        Command::Cache { action } => match action {
            CacheAction::Stats => println!("{}", feed.cache().stats().await),
            CacheAction::Clear => {
                let removed = feed.cache().clear().await?;
                println!("🗑️ Removed {} cache files from {}", removed, feed.cache().dir().display());
            }
        },
        Command::CheckConfig => {
            println!("{}", config.summary());
            info!("✅ Configuración válida");
        }
    }

    Ok(())
}

async fn print_channel(feed: &ChannelFeed, refresh: bool) {
    match feed.channel(refresh).await {
        Some(channel) => print!("{}", format_channel(&channel)),
        None => println!("📺 Channel info unavailable right now, try again later"),
    }
}
