use crate::error::{AppError, AppResult};
use flate2::read::GzDecoder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 压缩包格式，仅由扩展名决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// `.zip` 走 ZIP，其余一律按 tar+gzip 处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zip") => ArchiveFormat::Zip,
            _ => ArchiveFormat::TarGz,
        }
    }
}

/// 解压统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub entries: usize,
    pub failed: usize,
}

/// 一次解压任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveJob {
    pub archive: PathBuf,
    pub destination: PathBuf,
    pub format: ArchiveFormat,
}

impl ArchiveJob {
    pub fn new(archive: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        let archive = archive.into();
        let format = ArchiveFormat::from_path(&archive);
        Self {
            archive,
            destination: destination.into(),
            format,
        }
    }

    /// 解压全部条目。
    ///
    /// 单个条目出错时记录日志并继续处理剩余条目，只要有条目失败，
    /// 最终就返回 [`AppError::Extraction`]。压缩包本身保留在原处。
    pub fn run(&self) -> AppResult<ExtractSummary> {
        fs::create_dir_all(&self.destination)?;
        info!(
            archive = %self.archive.display(),
            dest = %self.destination.display(),
            format = ?self.format,
            "Extract..."
        );

        let summary = match self.format {
            ArchiveFormat::Zip => extract_zip(&self.archive, &self.destination)?,
            ArchiveFormat::TarGz => extract_tar_gz(&self.archive, &self.destination)?,
        };

        if summary.failed > 0 {
            return Err(AppError::extraction(&self.archive, summary.failed, summary.entries));
        }
        Ok(summary)
    }

    /// 在阻塞线程池中执行解压
    pub async fn run_blocking(self) -> AppResult<ExtractSummary> {
        tokio::task::spawn_blocking(move || self.run())
            .await
            .map_err(|e| AppError::Io(io::Error::new(io::ErrorKind::Other, e)))?
    }
}

/// 解压到目标目录
pub fn extract(archive: &Path, destination: &Path) -> AppResult<ExtractSummary> {
    ArchiveJob::new(archive, destination).run()
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> AppResult<ExtractSummary> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        AppError::invalid("archive", format!("读取 ZIP 文件 {} 失败: {}", archive_path.display(), e))
    })?;

    let mut summary = ExtractSummary::default();
    // 逐个条目处理，同一时间只打开一个读取流
    for index in 0..archive.len() {
        summary.entries += 1;
        if let Err(e) = extract_zip_entry(&mut archive, index, dest_dir) {
            summary.failed += 1;
            warn!(archive = %archive_path.display(), index, "解压条目失败: {}", e);
        }
    }

    Ok(summary)
}

fn extract_zip_entry(
    archive: &mut zip::ZipArchive<fs::File>,
    index: usize,
    dest_dir: &Path,
) -> AppResult<()> {
    let mut entry = archive
        .by_index(index)
        .map_err(|e| AppError::invalid("archive", format!("读取 ZIP 文件项失败: {}", e)))?;

    let relative = entry
        .enclosed_name()
        .map(Path::to_path_buf)
        .ok_or_else(|| AppError::invalid("archive", format!("不安全的条目路径: {}", entry.name())))?;
    let outpath = dest_dir.join(relative);

    if entry.is_dir() {
        fs::create_dir_all(&outpath)?;
        return Ok(());
    }

    if let Some(parent) = outpath.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut outfile = fs::File::create(&outpath)?;
    io::copy(&mut entry, &mut outfile)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = entry.unix_mode() {
            fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> AppResult<ExtractSummary> {
    let file = fs::File::open(archive_path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);

    let mut summary = ExtractSummary::default();
    for entry in archive.entries()? {
        summary.entries += 1;
        match entry.and_then(|mut entry| entry.unpack_in(dest_dir)) {
            Ok(true) => {}
            Ok(false) => {
                summary.failed += 1;
                warn!(archive = %archive_path.display(), "跳过不安全的条目路径");
            }
            Err(e) => {
                summary.failed += 1;
                warn!(archive = %archive_path.display(), "解压条目失败: {}", e);
            }
        }
    }

    Ok(summary)
}
