use crate::cli::commands::{Commands, ExecTarget};
use crate::cli::output::{format_versions, DownloadProgress};
use crate::core::RuntimeManager;
use crate::infrastructure::installer::InstallOutcome;
use crate::infrastructure::remote::fetcher::ProgressEvent;
use crate::utils::paths::NjarPaths;
use crate::utils::validation::VersionArg;

/// 命令处理器
pub struct CommandHandler {
    manager: RuntimeManager,
}

impl CommandHandler {
    /// 读取配置与 manifest，创建命令处理器
    pub fn new(paths: NjarPaths) -> Result<Self, String> {
        let manager = RuntimeManager::bootstrap(paths)
            .map_err(|e| e.with_context("初始化 njar").user_message())?;
        Ok(Self::with_manager(manager))
    }

    pub fn with_manager(manager: RuntimeManager) -> Self {
        Self { manager }
    }

    /// 处理命令
    pub async fn handle_command(&mut self, command: Commands) -> Result<(), String> {
        match command {
            Commands::Install { version } => self.handle_install(version).await,
            Commands::Use { version } => self.handle_use(version),
            Commands::Which => self.handle_which(),
            Commands::Versions => {
                print!(
                    "{}",
                    format_versions(&self.manager.versions(), self.manager.current_version())
                );
                Ok(())
            }
            Commands::Exec { args } => self.handle_exec(args).await,
        }
    }

    async fn handle_install(&mut self, version: VersionArg) -> Result<(), String> {
        let operation = format!("安装 openjdk{}", version);
        // 命令行安装总是下载，不受系统 Java 影响
        let mut options = self.manager.install_options();
        options.allow_system_java = false;

        let platform = options
            .platform()
            .map_err(|e| e.with_context(&operation).user_message())?;
        println!("📦 正在安装 openjdk{} ({})", version, platform);
        let progress = DownloadProgress::new();
        let callback = |event: ProgressEvent| progress.handle(event);

        let outcome = self
            .manager
            .install(version, &options, Some(&callback))
            .await
            .map_err(|e| e.with_context(&operation).user_message())?;

        match outcome {
            InstallOutcome::AlreadySatisfied => {
                println!("✅ 已存在可用的系统 Java，跳过下载");
            }
            InstallOutcome::Installed(installation) => {
                println!(
                    "✅ openjdk{} 已安装到 {}",
                    installation.version,
                    installation.java_home().display()
                );
                if self.manager.current_version() == installation.version {
                    println!("💡 已设为当前版本");
                } else {
                    println!("💡 使用 `njar use {}` 切换到该版本", installation.version);
                }
            }
        }
        Ok(())
    }

    fn handle_use(&mut self, version: VersionArg) -> Result<(), String> {
        self.manager
            .use_version(version)
            .map_err(|e| e.with_context(&format!("切换到 {}", version)).user_message())?;
        println!("✅ 当前版本: {}", version);
        Ok(())
    }

    fn handle_which(&self) -> Result<(), String> {
        let executable = self
            .manager
            .which()
            .map_err(|e| e.with_context("查找当前 java").user_message())?;
        println!("{}", executable.display());
        Ok(())
    }

    async fn handle_exec(&self, args: Vec<String>) -> Result<(), String> {
        let output = match ExecTarget::parse(args)? {
            ExecTarget::Jar { jar_path, args } => self
                .manager
                .run_jar(&jar_path, &args)
                .await
                .map_err(|e| {
                    e.with_context(&format!("执行 {}", jar_path.display()))
                        .user_message()
                })?,
            ExecTarget::Class {
                class_paths,
                class_name,
                args,
            } => self
                .manager
                .run_class(&class_name, &class_paths, &args)
                .await
                .map_err(|e| e.with_context(&format!("执行 {}", class_name)).user_message())?,
        };
        print!("{}", output);
        Ok(())
    }
}
