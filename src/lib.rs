//! # Only Vision
//!
//! `only_vision`项目是[only_torch](https://github.com/dbsxdbsx/only_torch)的姊妹项目，
//! 仿造[torchvision](https://pytorch.org/vision)提供轻量的图像分类数据集工具：
//! 下载并解压数据集归档，再按 CSV 清单以 `(图像, 标签)` 形式随机索引访问。
//!
//! # 主要组件
//!
//! - [`download::ensure_dataset`]: 幂等的归档下载与解压
//! - [`manifest::Manifest`]: CSV 清单表与训练/验证划分过滤
//! - [`datasets::ImageCsvDataset`]: 按清单访问的图像分类数据集
//! - [`datasets::Imagenette`]: Imagenette 示例配置（fastai 十分类子集）
//! - [`dataloader::DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`transforms`]: 标签编码器与图像/标签变换
//! - [`error::DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use only_vision::{DataLoader, Imagenette};
//!
//! // 下载（如有必要）并构建训练集
//! let dataset = Imagenette::train()?;
//! println!("样本数: {}, 类别数: {}", dataset.len(), dataset.num_classes());
//!
//! // PyTorch 风格迭代
//! let loader = DataLoader::new(&dataset, 32).shuffle(true).seed(42);
//! for batch in loader.iter() {
//!     for (image, label) in batch? {
//!         // ...
//!     }
//! }
//! ```

pub mod dataloader;
pub mod datasets;
pub mod download;
pub mod error;
pub mod manifest;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use dataloader::{Batch, DataLoader};
pub use datasets::{
    default_data_dir, ImageCsvDataset, ImageCsvDatasetBuilder, Imagenette, ImagenetteSize,
    LabelMode,
};
pub use download::ensure_dataset;
pub use error::DataError;
pub use manifest::{Manifest, Split};
pub use transforms::{CodecOrder, ImageTransform, Label, LabelCodec, LabelTransform};
