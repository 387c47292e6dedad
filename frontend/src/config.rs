//! 运行时配置
//!
//! 构建时可通过环境变量覆盖默认值（`BOOKY_API_URL`, `BOOKY_LOG_LEVEL`），
//! 运行时还可以在 LocalStorage 的 `booky_api_url` 中指定后端地址，
//! 方便在同一个构建产物上切换测试环境。

use leptos::prelude::*;
use log::LevelFilter;

use crate::web::storage::KeyValueStorage;

/// 这些是默认值，如果构建环境与 LocalStorage 中都没有定义，则使用这些值
const DEFAULT_API_URL: &str = "https://library-backend-production-b9cf.up.railway.app";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub const STORAGE_API_URL_KEY: &str = "booky_api_url";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 后端地址（不含结尾的 `/`）
    pub api_base_url: String,
    pub log_level: LevelFilter,
    /// 首页推荐每次加载的数量
    pub home_page_size: u32,
    pub category_page_size: u32,
    pub author_page_size: u32,
    pub related_limit: u32,
    pub admin_page_size: u32,
    /// 借阅天数
    pub loan_days: u32,
    /// 提示消息的展示时长
    pub notice_millis: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
            home_page_size: 10,
            category_page_size: 12,
            author_page_size: 12,
            related_limit: 8,
            admin_page_size: 10,
            loan_days: 7,
            notice_millis: 3000,
        }
    }
}

impl AppConfig {
    pub fn load<S: KeyValueStorage>(storage: &S) -> Self {
        Self::from_sources(
            option_env!("BOOKY_API_URL"),
            option_env!("BOOKY_LOG_LEVEL"),
            storage.get(STORAGE_API_URL_KEY),
        )
    }

    /// 优先级：LocalStorage > 构建环境变量 > 默认值
    fn from_sources(
        build_url: Option<&str>,
        build_level: Option<&str>,
        stored_url: Option<String>,
    ) -> Self {
        let mut config = Self::default();

        // 空白值视为未设置，继续回退到下一个来源
        fn non_blank(u: &str) -> Option<&str> {
            Some(u.trim()).filter(|u| !u.is_empty())
        }
        let url = stored_url
            .as_deref()
            .and_then(non_blank)
            .or_else(|| build_url.and_then(non_blank));
        if let Some(url) = url {
            config.api_base_url = url.to_string();
        }
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();

        if let Some(level) = build_level.and_then(|l| l.parse::<LevelFilter>().ok()) {
            config.log_level = level;
        }

        config
    }
}

/// 从 Context 获取配置
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_overrides() {
        let config = AppConfig::from_sources(None, None, None);
        assert_eq!(config, AppConfig::default());
        assert!(!config.api_base_url.ends_with('/'));
    }

    #[test]
    fn test_stored_url_wins_over_build_url() {
        let config = AppConfig::from_sources(
            Some("https://build.example"),
            None,
            Some("https://staging.example/".to_string()),
        );
        assert_eq!(config.api_base_url, "https://staging.example");
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let config = AppConfig::from_sources(Some("https://build.example/"), None, Some("  ".to_string()));
        assert_eq!(config.api_base_url, "https://build.example");

        let config = AppConfig::from_sources(Some(" "), None, Some(String::new()));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_log_level_override() {
        assert_eq!(
            AppConfig::from_sources(None, Some("debug"), None).log_level,
            LevelFilter::Debug
        );
        assert_eq!(
            AppConfig::from_sources(None, Some("loud"), None).log_level,
            LevelFilter::Info
        );
    }
}
