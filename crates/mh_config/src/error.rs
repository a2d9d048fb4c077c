// crates/mh_config/src/error.rs

//! 配置层错误类型

use mh_foundation::MhError;

/// 配置层结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 当前平台没有可用的三角化程序
    #[error("不支持的平台: os={os}, arch={arch}")]
    UnsupportedPlatform {
        /// 操作系统
        os: String,
        /// CPU 架构
        arch: String,
    },
}

impl ConfigError {
    /// 便捷构造：无效值
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// 便捷构造：不支持的平台
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }
}

impl From<ConfigError> for MhError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => MhError::io_with_source("配置文件读写失败", e),
            ConfigError::UnsupportedPlatform { os, arch } => {
                MhError::config(format!("不支持的平台: {os}/{arch}"))
            }
            other => MhError::config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid_value("min_angle", -1.0, "必须为正");
        assert!(err.to_string().contains("min_angle"));
    }

    #[test]
    fn test_unsupported_platform_to_foundation() {
        let err = ConfigError::unsupported_platform("macos", "aarch64");
        let mh: MhError = err.into();
        assert!(matches!(mh, MhError::Config { .. }));
        assert!(mh.to_string().contains("macos"));
    }
}
