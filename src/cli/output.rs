use crate::infrastructure::remote::fetcher::{file_name_from_url, ProgressEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// 创建下载进度条
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta}) {percent}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// 把下载事件渲染为终端进度条，每个下载对应一条进度条
#[derive(Default)]
pub struct DownloadProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl DownloadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, event: ProgressEvent) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };

        match event {
            ProgressEvent::Started { url, bytes_total } => {
                let pb = create_progress_bar(bytes_total.unwrap_or(0));
                pb.set_message(file_name_from_url(&url).unwrap_or(url));
                *slot = Some(pb);
            }
            ProgressEvent::Progress {
                bytes_done,
                bytes_total,
                ..
            } => {
                if let Some(pb) = slot.as_ref() {
                    if let Some(total) = bytes_total {
                        pb.set_length(total);
                    }
                    pb.set_position(bytes_done);
                }
            }
            ProgressEvent::Finished { bytes_done, .. } => {
                if let Some(pb) = slot.take() {
                    pb.set_position(bytes_done);
                    pb.finish();
                }
            }
        }
    }
}

/// 版本列表，当前版本标记为 `(*current)`
pub fn format_versions(versions: &[String], current: &str) -> String {
    if versions.is_empty() {
        return "📭 尚未安装任何 JDK 版本\n".to_string();
    }

    let mut output = String::new();
    for version in versions {
        if version == current {
            output.push_str(&format!("  {} (*current)\n", version));
        } else {
            output.push_str(&format!("  {}\n", version));
        }
    }
    output
}
