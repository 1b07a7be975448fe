//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件未找到（图像或清单文件缺失）
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 下载错误
    #[error("下载错误: {0}")]
    DownloadError(String),

    /// 校验和不匹配
    #[error("校验和不匹配: 期望 {expected}, 实际 {got}")]
    ChecksumMismatch { expected: String, got: String },

    /// 解压错误（归档损坏或格式不支持）
    #[error("解压错误: {0}")]
    ExtractionError(String),

    /// 清单错误（CSV 无法读取或格式不合法）
    #[error("清单错误: {0}")]
    ManifestError(String),

    /// 图像解码错误
    #[error("图像解码错误: {0}")]
    ImageError(String),

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 标签未在编码表中（清单可能已损坏）
    #[error("未知标签: {0}")]
    UnknownLabel(String),
}
