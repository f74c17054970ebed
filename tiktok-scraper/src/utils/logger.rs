use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志配置
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// JSON日志文件目录, None 时只输出到控制台
    pub log_dir: Option<PathBuf>,

    /// 未设置 RUST_LOG 时的默认级别
    pub default_level: Option<String>,
}

/// 初始化日志系统
///
/// - 控制台层: 人类可读格式, 写到 stderr (stdout 留给命令输出)
/// - 文件层(可选): JSON格式, 按天轮转, 文件名 tiktok-scraper.YYYY-MM-DD.log
/// - 环境变量控制: RUST_LOG=debug 可调整日志级别
///
/// 返回的guard必须被调用者保存, 直到程序退出。
/// 如果guard被drop, 文件写入器将被关闭。
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>, io::Error> {
    let default_level = config.default_level.as_deref().unwrap_or("info");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("tiktok-scraper")
                .filename_suffix("log")
                .build(dir)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;

    Ok(guard)
}

/// 日志宏辅助模块
///
/// 提供结构化日志的便捷宏
pub mod macros {
    /// 记录业务事件
    ///
    /// 使用示例:
    /// ```no_run
    /// use tiktok_scraper::log_event;
    /// log_event!(
    ///     "VideoScraped",
    ///     video_id = "712345",
    ///     fell_back = false
    /// );
    /// ```
    #[macro_export]
    macro_rules! log_event {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::info!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }

    /// 记录被跳过的批量条目
    ///
    /// 使用示例:
    /// ```no_run
    /// use tiktok_scraper::log_skip;
    /// log_skip!(
    ///     "NoWatermarkSkipped",
    ///     video_id = "712345",
    ///     error = "no asset descriptor"
    /// );
    /// ```
    #[macro_export]
    macro_rules! log_skip {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::warn!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }
}
