use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tiktok_scraper::FetchStrategy;

/// 短视频平台抓取命令行
#[derive(Parser)]
#[command(name = "tiktok-scraper")]
#[command(about = "抓取公开页面的视频/用户/音乐数据并输出JSON", long_about = None)]
pub struct Cli {
    /// 会话Cookie, 覆盖 TIKTOK_COOKIE
    #[arg(long, global = true)]
    pub cookie: Option<String>,

    /// 获取策略: auto | lightweight | rendered
    #[arg(long, global = true)]
    pub strategy: Option<FetchStrategy>,

    /// JSON日志目录, 不设置时只输出到控制台
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 单个视频
    Video {
        url: String,
        /// 替换为无水印地址
        #[arg(long)]
        no_watermark: bool,
    },
    /// 用户资料
    User { username: String },
    /// 用户主页上的视频
    Videos {
        username: String,
        #[arg(long)]
        no_watermark: bool,
    },
    /// 视频使用的音乐
    Music { url: String },
    /// 话题页上的视频
    Tag { tag: String },
    /// 作者 + 视频 + 音乐 聚合数据
    Scrape { url: String },
    /// 解析无水印地址 (视频链接或ID)
    NoWatermark { link_or_id: String },
    /// 批量下载用户的视频
    Download {
        username: String,
        /// 目标目录, 默认 <下载目录>/<用户名>
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// 下载带水印的原始文件
        #[arg(long)]
        watermark: bool,
    },
}
