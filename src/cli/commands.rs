use crate::utils::validation::{parse_version_arg, VersionArg};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// njar CLI 应用程序
#[derive(Parser)]
#[command(name = "njar")]
#[command(about = "安装 OpenJDK 运行时并通过所选版本执行 jar / class", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 顶级命令
#[derive(Subcommand)]
pub enum Commands {
    /// 安装 JDK 版本
    Install {
        /// 主版本号，例如 8、11、16
        #[arg(value_parser = parse_version_arg)]
        version: VersionArg,
    },
    /// 设置当前 JDK 版本
    Use {
        /// 已安装的版本或 system
        #[arg(value_parser = parse_version_arg)]
        version: VersionArg,
    },
    /// 显示当前版本 java 可执行文件的完整路径
    Which,
    /// 列出 njar 可用的所有 JDK 版本
    Versions,
    /// 执行 jar，或 `-cp <classpath> <class>` 执行指定类
    Exec {
        /// `<jar> [args...]` 或 `-cp <classpath> <class> [args...]`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
}

/// exec 的执行目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecTarget {
    Jar {
        jar_path: PathBuf,
        args: Vec<String>,
    },
    Class {
        class_paths: String,
        class_name: String,
        args: Vec<String>,
    },
}

impl ExecTarget {
    /// 解析 exec 后面的参数
    pub fn parse(args: Vec<String>) -> Result<Self, String> {
        let mut args = args.into_iter();
        match args.next().as_deref() {
            Some("-cp") => {
                let class_paths = args.next().ok_or("-cp 缺少 classpath")?;
                let class_name = args.next().ok_or("-cp 缺少要执行的类名")?;
                Ok(ExecTarget::Class {
                    class_paths,
                    class_name,
                    args: args.collect(),
                })
            }
            Some(jar_path) => Ok(ExecTarget::Jar {
                jar_path: PathBuf::from(jar_path),
                args: args.collect(),
            }),
            None => Err("缺少要执行的 jar 路径".to_string()),
        }
    }
}
