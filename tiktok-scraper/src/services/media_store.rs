//! 媒体文件落盘
//!
//! 批量下载需要的能力: 目录不存在时创建, 为一个路径打开写入流,
//! 以及把写完的临时文件提交为最终文件或丢弃。

use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncWrite;

use crate::models::ScrapeError;

/// 持久化边界
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// 创建目录 (已存在时不报错)
    async fn create_dir(&self, dir: &Path) -> Result<(), ScrapeError>;

    /// 打开文件写入流, 已存在的文件会被截断
    async fn open_write(
        &self,
        path: &Path,
    ) -> Result<Box<dyn AsyncWrite + Unpin + Send>, ScrapeError>;

    /// 把写完的临时文件改名为最终文件 (覆盖已有文件)
    async fn commit(&self, partial: &Path, path: &Path) -> Result<(), ScrapeError>;

    /// 删除未完成的临时文件, 文件不存在时不报错
    async fn discard(&self, partial: &Path) -> Result<(), ScrapeError>;
}

/// 本地文件系统实现
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMediaStore;

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn create_dir(&self, dir: &Path) -> Result<(), ScrapeError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_failed(dir, e))
    }

    async fn open_write(
        &self,
        path: &Path,
    ) -> Result<Box<dyn AsyncWrite + Unpin + Send>, ScrapeError> {
        let file = tokio::fs::File::create(path)
            .await
            .map_err(|e| io_failed(path, e))?;
        Ok(Box::new(file))
    }

    async fn commit(&self, partial: &Path, path: &Path) -> Result<(), ScrapeError> {
        tokio::fs::rename(partial, path)
            .await
            .map_err(|e| io_failed(path, e))
    }

    async fn discard(&self, partial: &Path) -> Result<(), ScrapeError> {
        match tokio::fs::remove_file(partial).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_failed(partial, e)),
        }
    }
}

fn io_failed(path: &Path, err: std::io::Error) -> ScrapeError {
    ScrapeError::DownloadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
