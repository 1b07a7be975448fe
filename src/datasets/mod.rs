//! 内置数据集
//!
//! 提供：
//! - [`ImageCsvDataset`]：按 CSV 清单访问的通用图像分类数据集
//! - [`Imagenette`]：Imagenette 示例配置（fastai 十分类子集）

mod image_csv;
mod imagenette;

use std::path::PathBuf;

pub use image_csv::{ImageCsvDataset, ImageCsvDatasetBuilder, LabelMode};
pub use imagenette::{
    class_name, Imagenette, ImagenetteSize, IMAGENETTE_CLASSES, IMAGENETTE_CSV,
};

/// 获取默认数据目录
pub fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("only_vision")
        .join("datasets")
}
