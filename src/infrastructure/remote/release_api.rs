use super::platform::Platform;
use crate::error::{AppError, AppResult};
use serde::Deserialize;

/// release 查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseQuery {
    pub registry: String,
    pub major_version: u32,
    pub openjdk_impl: String,
    pub release: String,
    pub jvm_type: String,
    pub platform: Platform,
}

impl ReleaseQuery {
    /// `{registry}/v2/info/releases/openjdk{N}?openjdk_impl=..&release=..&type=..&os=..&arch=..`
    pub fn url(&self) -> AppResult<String> {
        let base = format!(
            "{}/v2/info/releases/openjdk{}",
            self.registry.trim_end_matches('/'),
            self.major_version
        );
        let url = url::Url::parse_with_params(
            &base,
            &[
                ("openjdk_impl", self.openjdk_impl.as_str()),
                ("release", self.release.as_str()),
                ("type", self.jvm_type.as_str()),
                ("os", self.platform.os.as_str()),
                ("arch", self.platform.arch.as_str()),
            ],
        )
        .map_err(|e| AppError::config(format!("无效的 registry 地址 {}: {}", self.registry, e)))?;
        Ok(url.to_string())
    }
}

/// release 元数据返回体
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub release_name: Option<String>,
    #[serde(default)]
    pub binaries: Vec<ReleaseBinary>,
}

/// 单个二进制包
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseBinary {
    pub binary_link: String,
    pub checksum_link: String,
    #[serde(default)]
    pub binary_name: Option<String>,
    #[serde(default)]
    pub binary_size: Option<u64>,
}

impl ReleaseInfo {
    /// 取第一个二进制包
    pub fn first_binary(&self) -> AppResult<&ReleaseBinary> {
        self.binaries.first().ok_or_else(|| {
            AppError::runtime_not_found(format!(
                "release {} 中没有可用的二进制包",
                self.release_name.as_deref().unwrap_or("unknown")
            ))
        })
    }
}

/// 校验和文件的第一个字段即摘要，例如 `<hex>  OpenJDK8U-jre.tar.gz`
pub fn parse_checksum_text(text: &str) -> Option<String> {
    text.split_whitespace().next().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> ReleaseQuery {
        ReleaseQuery {
            registry: "https://api.adoptopenjdk.net/".to_string(),
            major_version: 8,
            openjdk_impl: "hotspot".to_string(),
            release: "latest".to_string(),
            jvm_type: "jre".to_string(),
            platform: Platform::from_host("macos", "x86_64").unwrap(),
        }
    }

    #[test]
    fn test_query_url() {
        assert_eq!(
            query().url().unwrap(),
            "https://api.adoptopenjdk.net/v2/info/releases/openjdk8?openjdk_impl=hotspot&release=latest&type=jre&os=mac&arch=x64"
        );
    }

    #[test]
    fn test_parse_release_info() {
        let json = r#"{
            "release_name": "jdk8u302-b08",
            "binaries": [{
                "os": "mac",
                "architecture": "x64",
                "binary_type": "jre",
                "binary_name": "OpenJDK8U-jre_x64_mac_hotspot_8u302b08.tar.gz",
                "binary_link": "https://example.com/OpenJDK8U-jre_x64_mac_hotspot_8u302b08.tar.gz",
                "binary_size": 41234567,
                "checksum_link": "https://example.com/OpenJDK8U-jre_x64_mac_hotspot_8u302b08.tar.gz.sha256.txt"
            }]
        }"#;
        let info: ReleaseInfo = serde_json::from_str(json).unwrap();
        let binary = info.first_binary().unwrap();
        assert!(binary.binary_link.ends_with(".tar.gz"));
        assert!(binary.checksum_link.ends_with(".sha256.txt"));
        assert_eq!(binary.binary_size, Some(41234567));
    }

    #[test]
    fn test_empty_binaries() {
        let info: ReleaseInfo = serde_json::from_str(r#"{"binaries": []}"#).unwrap();
        assert!(matches!(info.first_binary(), Err(AppError::RuntimeNotFound { .. })));
    }

    #[test]
    fn test_parse_checksum_text() {
        assert_eq!(
            parse_checksum_text("abc123  OpenJDK8U-jre.tar.gz\n"),
            Some("abc123".to_string())
        );
        assert_eq!(parse_checksum_text("abc123"), Some("abc123".to_string()));
        assert_eq!(parse_checksum_text("   \n"), None);
    }
}
