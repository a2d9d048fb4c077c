// crates/mh_config/src/platform.rs

//! 平台检测与三角化程序选择
//!
//! Triangle 以预编译二进制的形式随安装目录分发，位于
//! `<install_root>/triangle/bin/<binary>`。按操作系统和 CPU 架构选择变体。

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// 预编译二进制的相对目录
pub const TRIANGLE_BIN_DIR: &str = "triangle/bin";

/// 运行平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Linux 32 位 x86 (i686)
    Linux32,
    /// Linux 64 位 x86_64
    Linux64,
    /// Linux 32 位 ARM（树莓派 armv7l）
    LinuxArm32,
    /// Linux 64 位 ARM
    LinuxArm64,
    /// Windows（32 位程序同时用于 64 位系统）
    Windows,
}

impl Platform {
    /// 检测当前平台
    pub fn detect() -> ConfigResult<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// 由操作系统名和架构名确定平台
    ///
    /// 名称取值与 `std::env::consts::{OS, ARCH}` 一致。
    pub fn from_parts(os: &str, arch: &str) -> ConfigResult<Self> {
        match (os, arch) {
            ("linux", "x86") => Ok(Self::Linux32),
            ("linux", "x86_64") => Ok(Self::Linux64),
            ("linux", "arm") => Ok(Self::LinuxArm32),
            ("linux", "aarch64") => Ok(Self::LinuxArm64),
            ("windows", "x86" | "x86_64") => Ok(Self::Windows),
            _ => Err(ConfigError::unsupported_platform(os, arch)),
        }
    }

    /// 二进制文件名
    pub fn binary_name(&self) -> &'static str {
        match self {
            Self::Linux32 => "triangle_32",
            Self::Linux64 => "triangle_64",
            Self::LinuxArm32 => "triangle_pi32",
            Self::LinuxArm64 => "triangle_arm64",
            Self::Windows => "triangle_32.exe",
        }
    }

    /// 在安装目录下的二进制路径
    pub fn binary_path(&self, install_root: &Path) -> PathBuf {
        install_root.join(TRIANGLE_BIN_DIR).join(self.binary_name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux32 => "linux-x86",
            Self::Linux64 => "linux-x86_64",
            Self::LinuxArm32 => "linux-arm",
            Self::LinuxArm64 => "linux-aarch64",
            Self::Windows => "windows",
        };
        f.write_str(name)
    }
}
