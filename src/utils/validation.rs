use crate::core::constants::version::{SYSTEM_VERSION, VERSION_PATTERN};
use crate::error::{AppError, AppResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn version_regex() -> &'static Regex {
    static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();
    VERSION_REGEX.get_or_init(|| Regex::new(VERSION_PATTERN).expect("VERSION_PATTERN is valid"))
}

/// 命令行中的版本参数：数字主版本号或 `system`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionArg {
    Major(u32),
    System,
}

impl VersionArg {
    /// 按 `^(\d+|system)$` 校验并解析
    pub fn parse(input: &str) -> AppResult<Self> {
        if !version_regex().is_match(input) {
            return Err(AppError::invalid("version", format!("无效的 openjdk 版本 {}", input)));
        }
        if input == SYSTEM_VERSION {
            return Ok(VersionArg::System);
        }
        input
            .parse::<u32>()
            .map(VersionArg::Major)
            .map_err(|_| AppError::invalid("version", format!("版本号超出范围: {}", input)))
    }

    /// 在版本记录中使用的标识
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VersionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionArg::Major(major) => write!(f, "{}", major),
            VersionArg::System => f.write_str(SYSTEM_VERSION),
        }
    }
}

/// 供 clap 使用的参数解析函数
pub fn parse_version_arg(input: &str) -> Result<VersionArg, String> {
    VersionArg::parse(input).map_err(|e| e.to_string())
}
