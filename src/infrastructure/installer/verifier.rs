use crate::error::AppResult;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, error};

/// 计算文件的 SHA-256 摘要（小写十六进制）
pub async fn compute_digest(path: &Path) -> AppResult<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// 校验文件摘要是否与期望值完全一致（区分大小写）。
///
/// 读取文件失败时记录日志并返回 `false`。
pub async fn verify(path: &Path, expected: &str) -> bool {
    match compute_digest(path).await {
        Ok(actual) => {
            debug!(file = %path.display(), %actual, %expected, "校验 SHA-256");
            actual == expected
        }
        Err(e) => {
            error!(file = %path.display(), "校验失败: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_compute_digest_known_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hello.txt");
        std::fs::write(&file, b"hello world").unwrap();

        assert_eq!(
            compute_digest(&file).await.unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[tokio::test]
    async fn test_verify_own_digest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("archive.bin");
        std::fs::write(&file, vec![7u8; 20_000]).unwrap();

        let digest = compute_digest(&file).await.unwrap();
        assert!(verify(&file, &digest).await);
        assert!(!verify(&file, "deadbeef").await);
    }

    #[tokio::test]
    async fn test_verify_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();

        let digest = compute_digest(&file).await.unwrap();
        assert!(!verify(&file, &digest.to_uppercase()).await);
    }

    #[tokio::test]
    async fn test_verify_missing_file_is_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!verify(&dir.path().join("missing"), "deadbeef").await);
    }
}
