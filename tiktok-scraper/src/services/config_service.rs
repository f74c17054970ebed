use crate::models::{ConfigError, FetchStrategy, ScraperConfig};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// 配置键
pub const COOKIE_KEY: &str = "TIKTOK_COOKIE";
pub const USER_AGENT_KEY: &str = "TIKTOK_USER_AGENT";
pub const TIMEOUT_KEY: &str = "TIKTOK_TIMEOUT_SECS";
pub const MAX_IDLE_CONNECTIONS_KEY: &str = "TIKTOK_MAX_IDLE_CONNECTIONS";
pub const FETCH_STRATEGY_KEY: &str = "TIKTOK_FETCH_STRATEGY";
pub const CHROME_PATH_KEY: &str = "TIKTOK_CHROME_PATH";
pub const BATCH_DELAY_KEY: &str = "TIKTOK_BATCH_DELAY_MS";

/// 配置服务
///
/// 职责单一: 把 .env 文件与进程环境变量合成为一个 `ScraperConfig`。
/// 未设置的项使用默认值, 设置了但无法解析的项返回错误而不是静默忽略。
pub struct ConfigService;

impl ConfigService {
    /// 获取 .env 文件路径
    ///
    /// 查找顺序:
    /// 1. 当前工作目录的 .env
    /// 2. 上层目录的 .env (在 crate 目录内执行时)
    fn env_file_path() -> Option<PathBuf> {
        let cwd = env::current_dir().ok()?;

        let env_path = cwd.join(".env");
        if env_path.exists() {
            return Some(env_path);
        }

        cwd.parent()
            .map(|parent| parent.join(".env"))
            .filter(|p| p.exists())
    }

    /// 从 .env 与环境变量加载配置
    ///
    /// 进程环境变量优先于 .env 文件中的同名项
    pub fn load() -> Result<ScraperConfig, ConfigError> {
        if let Some(path) = Self::env_file_path() {
            match dotenvy::from_path(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "已加载 .env 文件"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, ".env 文件解析失败"),
            }
        }

        let vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with("TIKTOK_"))
            .collect();

        let config = Self::from_vars(&vars)?;
        tracing::info!(config = %config.summary_for_logging(), "抓取配置已加载");
        Ok(config)
    }

    /// 从键值表构建配置 (不读取进程环境)
    ///
    /// # 错误
    /// - `ConfigError::InvalidValue`: 数字项无法解析、获取策略未知、延迟范围格式错误
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<ScraperConfig, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = ScraperConfig::default().with_cookie(get(COOKIE_KEY));

        if let Some(ua) = get(USER_AGENT_KEY) {
            config = config.with_user_agent(ua);
        }
        if let Some(raw) = get(TIMEOUT_KEY) {
            let seconds = parse_number::<u64>(TIMEOUT_KEY, &raw)?;
            if seconds == 0 {
                return Err(invalid(TIMEOUT_KEY, &raw));
            }
            config = config.with_timeout(seconds);
        }
        if let Some(raw) = get(MAX_IDLE_CONNECTIONS_KEY) {
            let max = parse_number::<usize>(MAX_IDLE_CONNECTIONS_KEY, &raw)?;
            config = config.with_max_idle_connections(max);
        }
        if let Some(raw) = get(FETCH_STRATEGY_KEY) {
            let strategy = FetchStrategy::from_str(&raw).map_err(|_| invalid(FETCH_STRATEGY_KEY, &raw))?;
            config = config.with_fetch_strategy(strategy);
        }
        config = config.with_chrome_executable(get(CHROME_PATH_KEY));
        if let Some(raw) = get(BATCH_DELAY_KEY) {
            config = config.with_batch_delay(Some(parse_delay_range(&raw)?));
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| invalid(key, raw))
}

/// 延迟范围: `800` 或 `500-1500`
fn parse_delay_range(raw: &str) -> Result<(u64, u64), ConfigError> {
    match raw.split_once('-') {
        Some((min, max)) => Ok((
            parse_number(BATCH_DELAY_KEY, min.trim())?,
            parse_number(BATCH_DELAY_KEY, max.trim())?,
        )),
        None => {
            let fixed = parse_number(BATCH_DELAY_KEY, raw)?;
            Ok((fixed, fixed))
        }
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
