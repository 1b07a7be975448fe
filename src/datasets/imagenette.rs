//! Imagenette 数据集（示例配置）
//!
//! Imagenette 是 fastai 从 ImageNet 中抽出的十分类子集，
//! 归档内自带 `noisy_imagenette.csv` 清单（第 1 列为无噪声标签）。
//!
//! 本模块只是 [`ImageCsvDataset`] 的一份预置配置：
//! 归档地址、清单文件名和 WNID → 可读类名的对照表。
//! 通用数据集逻辑对标签集合没有任何假设，十分类表不参与其中。

use std::path::PathBuf;

use crate::datasets::{default_data_dir, ImageCsvDataset};
use crate::download::ensure_dataset;
use crate::error::DataError;
use crate::manifest::Split;

/// Imagenette 下载地址（fastai S3 镜像）
const IMAGENETTE_FULL_URL: &str = "https://s3.amazonaws.com/fast-ai-imageclas/imagenette2.tgz";
const IMAGENETTE_320_URL: &str = "https://s3.amazonaws.com/fast-ai-imageclas/imagenette2-320.tgz";
const IMAGENETTE_160_URL: &str = "https://s3.amazonaws.com/fast-ai-imageclas/imagenette2-160.tgz";

/// 归档内清单文件名
pub const IMAGENETTE_CSV: &str = "noisy_imagenette.csv";

/// WNID → 可读类名对照表（十分类）
pub const IMAGENETTE_CLASSES: [(&str, &str); 10] = [
    ("n01440764", "tench"),
    ("n02102040", "English springer"),
    ("n02979186", "cassette player"),
    ("n03000684", "chain saw"),
    ("n03028079", "church"),
    ("n03394916", "French horn"),
    ("n03417042", "garbage truck"),
    ("n03425413", "gas pump"),
    ("n03445777", "golf ball"),
    ("n03888257", "parachute"),
];

/// 查询 WNID 对应的可读类名
pub fn class_name(wnid: &str) -> Option<&'static str> {
    IMAGENETTE_CLASSES
        .iter()
        .find(|(id, _)| *id == wnid)
        .map(|(_, name)| *name)
}

/// Imagenette 尺寸变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagenetteSize {
    /// 原始尺寸
    Full,
    /// 最短边 320 像素
    Px320,
    /// 最短边 160 像素
    Px160,
}

impl ImagenetteSize {
    /// 该变体的归档下载地址
    pub fn url(&self) -> &'static str {
        match self {
            ImagenetteSize::Full => IMAGENETTE_FULL_URL,
            ImagenetteSize::Px320 => IMAGENETTE_320_URL,
            ImagenetteSize::Px160 => IMAGENETTE_160_URL,
        }
    }

    /// 归档解压后的文件夹名
    pub fn folder_name(&self) -> &'static str {
        match self {
            ImagenetteSize::Full => "imagenette2",
            ImagenetteSize::Px320 => "imagenette2-320",
            ImagenetteSize::Px160 => "imagenette2-160",
        }
    }
}

/// Imagenette 数据集入口
pub struct Imagenette;

impl Imagenette {
    /// 完整加载 API
    ///
    /// # 参数
    /// - `root`: 数据目录，None 则使用默认 (~/.cache/only_vision/datasets/imagenette)
    /// - `size`: 尺寸变体
    /// - `split`: 训练集或验证集
    /// - `download`: true=自动下载并解压缺失的归档
    ///
    /// # 返回
    /// 以默认选项构建的 [`ImageCsvDataset`]（标签列 1，不打乱）
    pub fn load(
        root: Option<&str>,
        size: ImagenetteSize,
        split: Split,
        download: bool,
    ) -> Result<ImageCsvDataset, DataError> {
        let data_dir = root
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir().join("imagenette"));

        let dataset_dir = if download {
            ensure_dataset(size.url(), &data_dir)?
        } else {
            let dir = data_dir.join(size.folder_name());
            if !dir.exists() {
                return Err(DataError::FileNotFound(dir));
            }
            dir
        };

        let manifest_path = dataset_dir.join(IMAGENETTE_CSV);
        ImageCsvDataset::new(manifest_path, &dataset_dir)
            .split(split)
            .build()
    }

    /// 便捷 API：加载 160px 训练集（默认路径，自动下载）
    pub fn train() -> Result<ImageCsvDataset, DataError> {
        Self::load(None, ImagenetteSize::Px160, Split::Train, true)
    }

    /// 便捷 API：加载 160px 验证集（默认路径，自动下载）
    pub fn validation() -> Result<ImageCsvDataset, DataError> {
        Self::load(None, ImagenetteSize::Px160, Split::Validation, true)
    }
}
