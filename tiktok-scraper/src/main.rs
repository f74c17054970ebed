mod cli;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;

use cli::{Cli, Commands};
use tiktok_scraper::models::ConfigError;
use tiktok_scraper::utils::logger::{self, LogConfig};
use tiktok_scraper::{ConfigService, DownloadOptions, ScrapeError, TikTokScraper};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("输出序列化失败: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // guard 必须存活到进程退出, 否则文件日志不会落盘
    let _guard = match logger::init(&LogConfig {
        log_dir: cli.log_dir.clone(),
        default_level: None,
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("日志系统初始化失败: {}", e);
            None
        }
    };

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "命令执行失败");
        if let CliError::Scrape(inner) = &e {
            if let Ok(json) = serde_json::to_string(inner) {
                eprintln!("{}", json);
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ConfigService::load()?;
    if cli.cookie.is_some() {
        config = config.with_cookie(cli.cookie);
    }
    if let Some(strategy) = cli.strategy {
        config = config.with_fetch_strategy(strategy);
    }

    let scraper = TikTokScraper::new(config)?;

    match cli.command {
        Commands::Video { url, no_watermark } => print_json(&scraper.video(&url, no_watermark).await?),
        Commands::User { username } => print_json(&scraper.user(&username).await?),
        Commands::Videos {
            username,
            no_watermark,
        } => print_json(&scraper.user_videos(&username, no_watermark).await?),
        Commands::Music { url } => print_json(&scraper.music(&url).await?),
        Commands::Tag { tag } => print_json(&scraper.hashtag(&tag).await?),
        Commands::Scrape { url } => print_json(&scraper.scrape(&url).await?),
        Commands::NoWatermark { link_or_id } => {
            println!("{}", scraper.no_watermark(&link_or_id).await?);
            Ok(())
        }
        Commands::Download {
            username,
            dir,
            watermark,
        } => {
            let report = scraper
                .download_user_videos(&username, DownloadOptions { dir, watermark })
                .await?;
            print_json(&report)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
