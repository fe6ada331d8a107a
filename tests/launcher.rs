#![cfg(unix)]

use njar::core::RuntimeManager;
use njar::environments::java::locator::FixedJavaLocator;
use njar::environments::java::{JavaCommand, Launcher, VersionStore};
use njar::error::AppError;
use njar::infrastructure::config::Config;
use njar::utils::paths::NjarPaths;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::OnceLock;

/// 模拟 java：丢弃 `-jar <jar>` 或 `-cp <cp>`，再按子命令计算
const FAKE_JAVA: &str = r#"#!/bin/sh
shift 2
if [ "$1" = "App.Main" ]; then
  shift
fi
case "$1" in
  add) echo $(($2 + $3)) ;;
  multiply) echo $(($2 * $3)) ;;
  warn) echo "partial"; echo "boom" >&2 ;;
  fail) exit 3 ;;
esac
"#;

/// 所有测试共用的 JAVA_HOME，在任何子进程启动前写好，避免 ETXTBSY
fn java_home() -> &'static Path {
    static HOME: OnceLock<tempfile::TempDir> = OnceLock::new();
    HOME.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let java = dir.path().join("bin").join("java");
        std::fs::create_dir_all(java.parent().unwrap()).unwrap();
        std::fs::write(&java, FAKE_JAVA).unwrap();
        std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();
        dir
    })
    .path()
}

fn launcher() -> Launcher {
    Launcher::new(JavaCommand::Path(java_home().join("bin").join("java")))
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn run_jar_returns_stdout() {
    let output = launcher()
        .run_jar(Path::new("Math.jar"), &args(&["add", "21", "32"]))
        .await
        .unwrap();
    assert_eq!(output, "53\n");
}

#[tokio::test]
async fn run_class_goes_through_shell() {
    let output = launcher()
        .run_class("App.Main", "lib/app.jar:classes", &args(&["multiply", "21", "33"]))
        .await
        .unwrap();
    assert_eq!(output, "693\n");
}

#[tokio::test]
async fn stderr_output_is_fatal_even_on_success() {
    let result = launcher()
        .run_jar(Path::new("Math.jar"), &args(&["warn"]))
        .await;

    match result {
        Err(AppError::ProcessStderr(message)) => assert!(message.contains("boom")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn silent_nonzero_exit_is_success() {
    let output = launcher()
        .run_jar(Path::new("Math.jar"), &args(&["fail"]))
        .await
        .unwrap();
    assert_eq!(output, "");
}

#[tokio::test]
async fn concurrent_runs_are_independent() {
    let launcher = launcher();
    let add = args(&["add", "1", "2"]);
    let multiply = args(&["multiply", "6", "7"]);

    let (a, b) = tokio::join!(
        launcher.run_jar(Path::new("Math.jar"), &add),
        launcher.run_class("App.Main", ".", &multiply)
    );
    assert_eq!(a.unwrap(), "3\n");
    assert_eq!(b.unwrap(), "42\n");
}

#[tokio::test]
async fn manager_runs_current_version() {
    let dir = tempfile::tempdir().unwrap();
    let paths = NjarPaths::new(dir.path());
    VersionStore::new(paths.manifest_path())
        .set("16", java_home())
        .set_current_version("16")
        .save()
        .unwrap();

    let manager = RuntimeManager::with_locator(
        paths,
        Config::default(),
        Box::new(FixedJavaLocator(None)),
    )
    .unwrap();

    assert_eq!(manager.which().unwrap(), java_home().join("bin").join("java"));
    let output = manager
        .run_jar(Path::new("Math.jar"), &args(&["add", "21", "32"]))
        .await
        .unwrap();
    assert_eq!(output, "53\n");
}

#[tokio::test]
async fn manager_without_runtime_fails() {
    let dir = tempfile::tempdir().unwrap();
    let manager = RuntimeManager::with_locator(
        NjarPaths::new(dir.path()),
        Config::default(),
        Box::new(FixedJavaLocator(None)),
    )
    .unwrap();

    let result = manager
        .run_class("App.Main", ".", &args(&["add", "1", "2"]))
        .await;
    assert!(matches!(result, Err(AppError::RuntimeNotFound { .. })));
}
