use crate::core::constants::network;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::DownloadConfig;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// 超时重试策略：每次尝试的超时时间与最大尝试次数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(network::DEFAULT_ATTEMPT_TIMEOUT_MS),
            max_attempts: network::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// 从配置创建重试策略
    pub fn from_config(config: &DownloadConfig) -> Self {
        Self {
            timeout: config.attempt_timeout(),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

/// 单次尝试失败的分类：超时可以重试，其余错误立即失败
#[derive(Debug)]
pub enum AttemptError {
    TimedOut,
    Fatal(AppError),
}

impl From<AppError> for AttemptError {
    fn from(error: AppError) -> Self {
        AttemptError::Fatal(error)
    }
}

impl From<io::Error> for AttemptError {
    fn from(error: io::Error) -> Self {
        AttemptError::Fatal(AppError::Io(error))
    }
}

/// 下载进度事件
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Started {
        url: String,
        bytes_total: Option<u64>,
    },
    Progress {
        bytes_done: u64,
        bytes_total: Option<u64>,
        elapsed: Duration,
    },
    Finished {
        bytes_done: u64,
        elapsed: Duration,
    },
}

/// 进度回调，由调用方决定如何展示
pub type ProgressCallback<'a> = &'a (dyn Fn(ProgressEvent) + Send + Sync);

/// 限制进度事件频率：距上次发出不足 `interval` 时丢弃
#[derive(Debug, Clone, Copy)]
struct ProgressThrottle {
    interval: Duration,
    started_at: Instant,
    last_emit: Instant,
}

impl ProgressThrottle {
    fn new(interval: Duration, started_at: Instant) -> Self {
        Self {
            interval,
            started_at,
            last_emit: started_at,
        }
    }

    /// 需要发出事件时返回自开始以来的耗时
    fn tick(&mut self, now: Instant) -> Option<Duration> {
        if now.duration_since(self.last_emit) < self.interval {
            return None;
        }
        self.last_emit = now;
        Some(now.duration_since(self.started_at))
    }
}

/// 按策略执行 `attempt`，仅在超时时重试。
///
/// `attempt` 收到当前尝试序号（从 1 开始）。所有尝试都超时时，
/// 恰好执行 `max_attempts` 次后返回 [`AppError::Timeout`]。
pub async fn retry_on_timeout<T, F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut attempt: F,
) -> AppResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        match attempt(attempts).await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => {
                error!(url, attempts, "请求失败: {}", e);
                return Err(e);
            }
            Err(AttemptError::TimedOut) => {
                if attempts >= max_attempts {
                    error!(url, attempts, "请求超时，已达到最大尝试次数");
                    return Err(AppError::Timeout {
                        url: url.to_string(),
                        attempts,
                    });
                }
                warn!(url, "请求超时 (尝试 {}/{})，重试中...", attempts, max_attempts);
            }
        }
    }
}

/// 在超时时间内等待 future 完成
async fn within<T>(timeout: Duration, fut: impl Future<Output = T>) -> Result<T, AttemptError> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| AttemptError::TimedOut)
}

fn classify_reqwest_error(url: &str, e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        AttemptError::TimedOut
    } else {
        AttemptError::Fatal(AppError::network(format!("{} (URL: {})", e, url)))
    }
}

/// 从 URL 提取文件名
pub fn file_name_from_url(url: &str) -> AppResult<String> {
    let parsed = url::Url::parse(url).map_err(|e| AppError::invalid("url", format!("{}: {}", url, e)))?;
    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::invalid("url", format!("无法从 {} 推断文件名", url)))
}

/// 带超时重试的 HTTP GET 客户端
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    /// 创建新的下载器
    pub fn new(policy: RetryPolicy) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(network::USER_AGENT)
            .connect_timeout(policy.timeout)
            .build()
            .map_err(|e| AppError::network(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self { client, policy })
    }

    /// 发送请求并等待响应头，非 2xx 状态码视为永久错误
    async fn send(&self, url: &str) -> Result<Response, AttemptError> {
        let response = within(self.policy.timeout, self.client.get(url).send())
            .await?
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Fatal(AppError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }));
        }
        Ok(response)
    }

    /// GET 请求并读取完整响应体，整个尝试受单次超时约束
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        retry_on_timeout(&self.policy, url, |attempt| async move {
            debug!(url, attempt, "GET");
            within(self.policy.timeout, async {
                let response = self.send(url).await?;
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| classify_reqwest_error(url, e))?;
                Ok::<_, AttemptError>(body.to_vec())
            })
            .await?
        })
        .await
    }

    /// GET 请求并返回 JSON
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        info!("Fetching {}", url);
        let body = self.fetch_bytes(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// GET 请求并返回文本
    pub async fn fetch_text(&self, url: &str) -> AppResult<String> {
        let body = self.fetch_bytes(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// 下载到目录中，文件名取 URL 的最后一段，返回文件路径
    pub async fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: Option<ProgressCallback<'_>>,
    ) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(dest_dir).await?;
        let file_path = dest_dir.join(file_name_from_url(url)?);
        self.download_to_file(url, &file_path, progress).await?;
        Ok(file_path)
    }

    /// 流式下载到文件，返回写入的字节数。
    ///
    /// 超时约束的是响应头以及每个数据块的等待时间。每次重试都从头写入，
    /// 覆盖上一次残留的内容。
    pub async fn download_to_file(
        &self,
        url: &str,
        file_path: &Path,
        progress: Option<ProgressCallback<'_>>,
    ) -> AppResult<u64> {
        info!("Download {}", url);
        retry_on_timeout(&self.policy, url, |attempt| async move {
            debug!(url, attempt, file = %file_path.display(), "下载尝试");
            self.download_attempt(url, file_path, progress).await
        })
        .await
    }

    async fn download_attempt(
        &self,
        url: &str,
        file_path: &Path,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<u64, AttemptError> {
        let response = self.send(url).await?;
        let bytes_total = response.content_length();
        let started_at = Instant::now();
        let mut throttle = ProgressThrottle::new(
            Duration::from_millis(network::PROGRESS_INTERVAL_MS),
            started_at,
        );

        let emit = |event: ProgressEvent| {
            if let Some(callback) = progress {
                callback(event);
            }
        };

        emit(ProgressEvent::Started {
            url: url.to_string(),
            bytes_total,
        });

        let mut file = tokio::fs::File::create(file_path).await?;
        let mut stream = response.bytes_stream();
        let mut bytes_done = 0u64;

        while let Some(chunk) = within(self.policy.timeout, stream.next()).await? {
            let chunk = chunk.map_err(|e| classify_reqwest_error(url, e))?;
            file.write_all(&chunk).await?;
            bytes_done += chunk.len() as u64;

            if let Some(elapsed) = throttle.tick(Instant::now()) {
                emit(ProgressEvent::Progress {
                    bytes_done,
                    bytes_total,
                    elapsed,
                });
            }
        }

        file.flush().await?;
        emit(ProgressEvent::Finished {
            bytes_done,
            elapsed: started_at.elapsed(),
        });

        Ok(bytes_done)
    }
}
