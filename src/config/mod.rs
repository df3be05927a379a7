/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖与校验。配置只影响诊断与日志，
/// 数学运算本身不读取任何配置。
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod simd;
pub mod tolerance;

pub use simd::SimdConfig;
pub use tolerance::ToleranceConfig;

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 数学库主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathConfig {
    /// 后端诊断配置
    #[serde(default)]
    pub simd: SimdConfig,

    /// 数值容差
    #[serde(default)]
    pub tolerance: ToleranceConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl_default!(MathConfig {
    simd: SimdConfig::default(),
    tolerance: ToleranceConfig::default(),
    logging: LoggingConfig::default(),
});

impl MathConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    ///
    /// 无法解析的值被忽略，保留原配置。
    pub fn apply_env_overrides(&mut self) {
        // 后端诊断
        if let Ok(val) = env::var("GAME_MATH_REQUIRE_HARDWARE") {
            self.simd.require_hardware = val.parse().unwrap_or(self.simd.require_hardware);
        }
        if let Ok(val) = env::var("GAME_MATH_EQUIVALENCE_SAMPLES") {
            if let Ok(samples) = val.parse() {
                self.simd.equivalence_samples = samples;
            }
        }
        if let Ok(val) = env::var("GAME_MATH_EQUIVALENCE_SEED") {
            if let Ok(seed) = val.parse() {
                self.simd.equivalence_seed = seed;
            }
        }

        // 容差
        if let Ok(val) = env::var("GAME_MATH_TOLERANCE_ABSOLUTE") {
            if let Ok(absolute) = val.parse() {
                self.tolerance.absolute = absolute;
            }
        }
        if let Ok(val) = env::var("GAME_MATH_TOLERANCE_RELATIVE") {
            if let Ok(relative) = val.parse() {
                self.tolerance.relative = relative;
            }
        }

        // 日志
        if let Ok(val) = env::var("GAME_MATH_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&val) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.simd.validate()?;
        self.tolerance.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./game_math.toml
    /// 2. ./game_math.json
    /// 3. 平台配置目录下的 game_math/config.toml（Linux上为 ~/.config）
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        // 尝试当前目录的TOML
        if let Ok(config) = Self::from_toml_file("game_math.toml") {
            tracing::info!(target: "game_math::config", "Loaded config from game_math.toml");
            return config;
        }

        // 尝试当前目录的JSON
        if let Ok(config) = Self::from_json_file("game_math.json") {
            tracing::info!(target: "game_math::config", "Loaded config from game_math.json");
            return config;
        }

        // 尝试用户配置目录
        if let Some(config_path) = Self::user_config_path() {
            match Self::from_toml_file(&config_path) {
                Ok(config) => {
                    tracing::info!(target: "game_math::config", "Loaded config from {:?}", config_path);
                    return config;
                }
                Err(ConfigError::FileError(_)) => {}
                Err(e) => {
                    tracing::warn!(target: "game_math::config", "Ignoring {:?}: {}", config_path, e);
                }
            }
        }

        tracing::info!(target: "game_math::config", "Using default configuration");
        Self::default()
    }

    /// 用户级配置文件路径
    pub(crate) fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("game_math").join("config.toml"))
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（未设置 `RUST_LOG` 时生效）
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,

    /// 是否输出事件目标（模块路径）
    pub show_target: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
    show_target: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 解析级别名称（不区分大小写）
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// `EnvFilter` 指令形式
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
