use super::locator::{java_binary_relative, JavaLocator};
use super::version_store::VersionStore;
use crate::error::{AppError, AppResult};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// 用于启动程序的 java 命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaCommand {
    /// 系统 Java，通过 PATH 中的 `java` 调用
    System,
    /// 指定路径的 java 可执行文件
    Path(PathBuf),
}

impl JavaCommand {
    /// 存在系统 Java 时总是使用 `java`，否则使用当前选中版本的可执行文件
    pub fn resolve(store: &VersionStore, locator: &dyn JavaLocator) -> AppResult<Self> {
        if locator.system_java_exists() {
            return Ok(JavaCommand::System);
        }
        Self::current(store).map(JavaCommand::Path)
    }

    /// 当前选中版本的 java 可执行文件路径
    pub fn current(store: &VersionStore) -> AppResult<PathBuf> {
        let version = store.current_version();
        if version.is_empty() {
            return Err(AppError::runtime_not_found("没有选中任何 Java 版本"));
        }

        let java_home = store
            .get(version)
            .ok_or_else(|| AppError::runtime_not_found(format!("版本 {} 尚未安装", version)))?;

        let executable = java_home.join(java_binary_relative());
        if !executable.is_file() {
            return Err(AppError::runtime_not_found(format!(
                "{} 不存在",
                executable.display()
            )));
        }
        Ok(executable)
    }

    pub fn program(&self) -> OsString {
        match self {
            JavaCommand::System => OsString::from("java"),
            JavaCommand::Path(path) => path.clone().into_os_string(),
        }
    }
}

/// 通过选定的 java 启动 jar 或 class，返回子进程的标准输出
#[derive(Debug, Clone)]
pub struct Launcher {
    command: JavaCommand,
}

impl Launcher {
    pub fn new(command: JavaCommand) -> Self {
        Self { command }
    }

    /// 按当前版本记录和系统 Java 解析命令
    pub fn resolve(store: &VersionStore, locator: &dyn JavaLocator) -> AppResult<Self> {
        Ok(Self::new(JavaCommand::resolve(store, locator)?))
    }

    /// `java -jar <jar> <args...>`
    pub async fn run_jar(&self, jar_path: &Path, args: &[String]) -> AppResult<String> {
        let mut command = Command::new(self.command.program());
        command.arg("-jar").arg(jar_path).args(args);
        debug!(jar = %jar_path.display(), ?args, "run jar");
        capture_stdout(command).await
    }

    /// `java -cp <classpath> <class> <args...>`，经由 shell 执行以支持 shell 风格的 classpath
    pub async fn run_class(
        &self,
        class_name: &str,
        class_paths: &str,
        args: &[String],
    ) -> AppResult<String> {
        let line = self.class_command_line(class_name, class_paths, args);
        debug!(%line, "run class");
        capture_stdout(shell_command(&line)).await
    }

    fn class_command_line(&self, class_name: &str, class_paths: &str, args: &[String]) -> String {
        let program = self.command.program().to_string_lossy().into_owned();
        let program = if program.contains(char::is_whitespace) {
            format!("\"{}\"", program)
        } else {
            program
        };

        let mut parts = vec![program, "-cp".to_string(), class_paths.to_string(), class_name.to_string()];
        parts.extend(args.iter().cloned());
        parts.join(" ")
    }
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(line);
    command
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(line);
    command
}

/// 运行子进程并收集标准输出。
///
/// 标准输出按到达顺序拼接；标准错误上出现任何数据都立即判定失败，
/// 即使进程随后正常退出。退出码不参与判断。
async fn capture_stdout(mut command: Command) -> AppResult<String> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AppError::runtime_not_found(format!("无法启动 java: {}", e)),
        _ => AppError::Io(e),
    })?;

    let (mut stdout, mut stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        _ => return Err(AppError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "子进程输出不可用"))),
    };

    let mut output = Vec::new();
    let mut out_buf = [0u8; 8192];
    let mut err_buf = [0u8; 8192];
    let mut stdout_open = true;
    let mut stderr_open = true;

    while stdout_open || stderr_open {
        tokio::select! {
            n = stdout.read(&mut out_buf), if stdout_open => {
                match n? {
                    0 => stdout_open = false,
                    n => output.extend_from_slice(&out_buf[..n]),
                }
            }
            n = stderr.read(&mut err_buf), if stderr_open => {
                match n? {
                    0 => stderr_open = false,
                    n => {
                        let message = String::from_utf8_lossy(&err_buf[..n]).into_owned();
                        warn!("子进程写入了标准错误: {}", message.trim_end());
                        return Err(AppError::ProcessStderr(message));
                    }
                }
            }
        }
    }

    let status = child.wait().await?;
    debug!(?status, bytes = output.len(), "子进程结束");
    Ok(String::from_utf8_lossy(&output).into_owned())
}
