//! 标签编码与数据变换
//!
//! 提供：
//! - [`Label`]: 样本标签（整数编码或原始字符串）
//! - [`LabelCodec`]: 原始标签 ⇄ 稠密整数编码的双射
//! - [`ImageTransform`] / [`LabelTransform`]: 访问时挂载的变换钩子
//! - 常用图像变换（缩放、中心裁剪）

use std::collections::{HashMap, HashSet};

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::error::DataError;

/// 样本标签
///
/// 标签在急切翻译模式下是整数编码，在惰性模式下由编码器或
/// 自定义变换在访问时产出，原始形式是字符串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// 稠密整数编码
    Code(usize),
    /// 原始标签字符串
    Text(String),
}

impl Label {
    /// 取整数编码，若是原始字符串则返回 None
    pub fn as_code(&self) -> Option<usize> {
        match self {
            Label::Code(code) => Some(*code),
            Label::Text(_) => None,
        }
    }

    /// 取原始字符串，若是整数编码则返回 None
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Label::Code(_) => None,
            Label::Text(text) => Some(text),
        }
    }
}

/// 编码分配顺序
///
/// 该选择决定每个标签映射到哪个整数，构建后不可更改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecOrder {
    /// 按标签首次出现的顺序分配编码（默认，与 pandas `unique` 一致）
    #[default]
    FirstAppearance,
    /// 按标签字典序分配编码，与数据行顺序无关
    Sorted,
}

/// 标签编码器
///
/// 划分内出现的每个不同原始标签映射到 `[0, distinct_count)` 内
/// 唯一的整数编码，构建一次后只读。
#[derive(Debug, Clone)]
pub struct LabelCodec {
    /// 编码 → 原始标签
    labels: Vec<String>,
    /// 原始标签 → 编码
    codes: HashMap<String, usize>,
}

impl LabelCodec {
    /// 从标签序列构建编码器
    ///
    /// # 参数
    /// - `raw_labels`: 原始标签序列，重复值只记一次
    /// - `order`: 编码分配顺序
    pub fn from_labels<'a, I>(raw_labels: I, order: CodecOrder) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        // 去重，保留首次出现顺序
        let mut distinct: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for label in raw_labels {
            if seen.insert(label) {
                distinct.push(label.to_string());
            }
        }

        if order == CodecOrder::Sorted {
            distinct.sort();
        }

        let codes = distinct
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code))
            .collect();

        Self {
            labels: distinct,
            codes,
        }
    }

    /// 原始标签 → 整数编码
    ///
    /// # 返回
    /// 标签不在编码表中返回 `DataError::UnknownLabel`
    pub fn encode(&self, label: &str) -> Result<usize, DataError> {
        self.codes
            .get(label)
            .copied()
            .ok_or_else(|| DataError::UnknownLabel(label.to_string()))
    }

    /// 整数编码 → 原始标签
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// 不同标签的数量
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// 编码表是否为空
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 按编码顺序排列的全部标签
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// 图像变换钩子：解码后的图像 → 变换后的图像
pub type ImageTransform = Box<dyn Fn(RgbImage) -> RgbImage + Send + Sync>;

/// 标签变换钩子：标签 → 变换后的标签
pub type LabelTransform = Box<dyn Fn(Label) -> Label + Send + Sync>;

/// 缩放图像到指定尺寸（Triangle 滤波）
pub fn resize(image: &RgbImage, height: u32, width: u32) -> RgbImage {
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// 基于中心裁剪图像到指定尺寸
///
/// # Panics
/// 新尺寸大于原始尺寸时 panic
pub fn center_crop(image: &RgbImage, height: u32, width: u32) -> RgbImage {
    assert!(height <= image.height(), "裁剪图像：新高度必须小于原始高度。");
    assert!(width <= image.width(), "裁剪图像：新宽度必须小于原始宽度。");
    imageops::crop_imm(
        image,
        (image.width() - width) / 2,
        (image.height() - height) / 2,
        width,
        height,
    )
    .to_image()
}

/// 构造缩放变换，可直接作为 [`ImageTransform`] 挂载
pub fn resize_to(height: u32, width: u32) -> ImageTransform {
    Box::new(move |image| resize(&image, height, width))
}

/// 构造中心裁剪变换，可直接作为 [`ImageTransform`] 挂载
pub fn center_crop_to(height: u32, width: u32) -> ImageTransform {
    Box::new(move |image| center_crop(&image, height, width))
}
