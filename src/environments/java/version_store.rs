use super::locator::JavaLocator;
use crate::core::constants::version::SYSTEM_VERSION;
use crate::error::AppResult;
use crate::utils::paths::NjarPaths;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 版本到 JAVA_HOME 的映射，保持插入顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Installations(Vec<(String, PathBuf)>);

impl Installations {
    pub fn get(&self, version: &str) -> Option<&Path> {
        self.0
            .iter()
            .find(|(v, _)| v == version)
            .map(|(_, home)| home.as_path())
    }

    /// 已存在的版本原位覆盖，否则追加到末尾
    pub fn insert(&mut self, version: String, java_home: PathBuf) {
        match self.0.iter_mut().find(|(v, _)| *v == version) {
            Some(entry) => entry.1 = java_home,
            None => self.0.push((version, java_home)),
        }
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(v, _)| v.as_str())
    }
}

impl Serialize for Installations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (version, java_home) in &self.0 {
            map.serialize_entry(version, java_home)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Installations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InstallationsVisitor;

        impl<'de> Visitor<'de> for InstallationsVisitor {
            type Value = Installations;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of version to java home")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut installations = Installations::default();
                while let Some((version, java_home)) = access.next_entry::<String, PathBuf>()? {
                    installations.insert(version, java_home);
                }
                Ok(installations)
            }
        }

        deserializer.deserialize_map(InstallationsVisitor)
    }
}

/// manifest.json 的内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, alias = "jrePath")]
    pub installations: Installations,
    #[serde(default)]
    pub current_version: String,
}

/// 已安装运行时及当前版本的记录。
///
/// 修改只作用于内存，调用 [`VersionStore::save`] 时整体覆盖写回磁盘。
/// 没有任何锁：多个进程同时保存时以最后一次写入为准。
#[derive(Debug, Clone)]
pub struct VersionStore {
    manifest_path: PathBuf,
    manifest: Manifest,
}

impl VersionStore {
    /// 空的内存记录，不读取磁盘
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            manifest: Manifest::default(),
        }
    }

    /// 从 manifest 文件加载，文件不存在时返回空记录
    pub fn load(manifest_path: impl Into<PathBuf>) -> AppResult<Self> {
        let mut store = Self::new(manifest_path);
        if store.manifest_path.exists() {
            let content = fs::read_to_string(&store.manifest_path)?;
            store.manifest = serde_json::from_str(&content)?;
            debug!(path = %store.manifest_path.display(), "已加载 manifest");
        }
        Ok(store)
    }

    /// 进程启动时调用一次：加载 manifest，并登记系统 Java
    pub fn initialize(paths: &NjarPaths, locator: &dyn JavaLocator) -> AppResult<Self> {
        let mut store = Self::load(paths.manifest_path())?;
        store.register_system(locator.system_java_home());
        Ok(store)
    }

    /// 把系统 Java 记为 `system`，当前版本为空时顺带选中它
    pub fn register_system(&mut self, system_home: Option<PathBuf>) -> &mut Self {
        if let Some(home) = system_home {
            info!(home = %home.display(), "发现系统 Java");
            self.set(SYSTEM_VERSION, home);
            if self.current_version().is_empty() {
                self.set_current_version(SYSTEM_VERSION);
            }
        }
        self
    }

    pub fn get(&self, version: &str) -> Option<&Path> {
        self.manifest.installations.get(version)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.get(version).is_some()
    }

    pub fn set(&mut self, version: &str, java_home: impl Into<PathBuf>) -> &mut Self {
        self.manifest
            .installations
            .insert(version.to_string(), java_home.into());
        self
    }

    /// 当前版本，未设置时为空字符串
    pub fn current_version(&self) -> &str {
        &self.manifest.current_version
    }

    /// 不校验版本是否已安装，错误会在启动时暴露
    pub fn set_current_version(&mut self, version: &str) -> &mut Self {
        self.manifest.current_version = version.to_string();
        self
    }

    /// 按插入顺序列出版本
    pub fn list_versions(&self) -> Vec<String> {
        self.manifest
            .installations
            .versions()
            .map(str::to_string)
            .collect()
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// 序列化并完整覆盖 manifest 文件
    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.manifest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.manifest)?;
        fs::write(&self.manifest_path, content)?;
        debug!(path = %self.manifest_path.display(), "已保存 manifest");
        Ok(())
    }
}
