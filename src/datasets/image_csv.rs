//! CSV 清单图像数据集
//!
//! 由清单表和图像根目录构成的定长、可随机索引的 `(图像, 标签)` 序列，
//! 支持划分选择、带种子的打乱以及访问时的图像/标签变换。

use std::path::{Path, PathBuf};

use csv::StringRecord;
use image::RgbImage;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::DataError;
use crate::manifest::{Manifest, Split};
use crate::transforms::{CodecOrder, ImageTransform, Label, LabelCodec, LabelTransform};

/// 图像相对路径所在列（固定第 0 列）
const PATH_COL: usize = 0;

/// 标签翻译模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// 构建时就地把标签列改写为整数编码
    EagerTranslate,
    /// 访问时再经编码器（或自定义标签变换）翻译（默认，与原始行为一致）
    #[default]
    LazyTranslate,
}

/// CSV 清单图像数据集
///
/// 构建后只读：底层表和编码器不再变化，多个线程可并发调用
/// [`get`](ImageCsvDataset::get)。构建本身不提供同步，需要调用方自行串行化。
///
/// # 示例
/// ```ignore
/// use only_vision::datasets::ImageCsvDataset;
/// use only_vision::manifest::Split;
///
/// let dataset = ImageCsvDataset::new("data/imagenette2-160/noisy_imagenette.csv",
///                                    "data/imagenette2-160")
///     .split(Split::Train)
///     .shuffle(true)
///     .seed(42)
///     .build()?;
///
/// let (image, label) = dataset.get(0)?;
/// ```
pub struct ImageCsvDataset {
    image_root: PathBuf,
    records: Vec<StringRecord>,
    /// 急切模式下预先翻译好的标签编码，与 records 等长（惰性模式下为空）
    eager_codes: Vec<usize>,
    labels_col: usize,
    split: Split,
    codec: LabelCodec,
    label_mode: LabelMode,
    transform: Option<ImageTransform>,
    label_transform: Option<LabelTransform>,
}

impl ImageCsvDataset {
    /// 创建数据集构建器
    ///
    /// # 参数
    /// - `manifest_path`: 清单 CSV 文件路径
    /// - `image_root`: 图像根目录，与清单第 0 列的相对路径拼接
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        manifest_path: P,
        image_root: Q,
    ) -> ImageCsvDatasetBuilder {
        ImageCsvDatasetBuilder::new(manifest_path, image_root)
    }

    /// 数据集样本数量
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 获取第 index 个样本
    ///
    /// 图像解码后统一为 3 通道 RGB；若配置了图像变换则在此应用。
    /// 标签在急切模式下直接取预翻译的编码；在惰性模式下，配置了
    /// 标签变换则把原始标签交给变换，否则经编码器翻译。
    ///
    /// # 返回
    /// - 索引越界返回 `DataError::IndexOutOfBounds`
    /// - 图像文件缺失返回 `DataError::FileNotFound`
    /// - 图像无法解码返回 `DataError::ImageError`
    pub fn get(&self, index: usize) -> Result<(RgbImage, Label), DataError> {
        let path = self.image_path(index)?;
        if !path.exists() {
            return Err(DataError::FileNotFound(path));
        }

        let image = image::open(&path)
            .map_err(|e| DataError::ImageError(format!("解码 {path:?} 失败: {e}")))?
            .to_rgb8();

        let image = match &self.transform {
            Some(f) => f(image),
            None => image,
        };

        let label = match self.label_mode {
            LabelMode::EagerTranslate => Label::Code(self.eager_codes[index]),
            LabelMode::LazyTranslate => {
                let raw = self.raw_label(index)?;
                match &self.label_transform {
                    Some(f) => f(Label::Text(raw.to_string())),
                    None => Label::Code(self.codec.encode(raw)?),
                }
            }
        };

        Ok((image, label))
    }

    /// 第 index 个样本的图像完整路径
    pub fn image_path(&self, index: usize) -> Result<PathBuf, DataError> {
        let record = self.record(index)?;
        let relative = record.get(PATH_COL).ok_or_else(|| {
            DataError::ManifestError(format!("第 {index} 行缺少路径列"))
        })?;
        Ok(self.image_root.join(relative))
    }

    /// 第 index 个样本的原始标签字符串
    pub fn raw_label(&self, index: usize) -> Result<&str, DataError> {
        let record = self.record(index)?;
        record.get(self.labels_col).ok_or_else(|| {
            DataError::ManifestError(format!("第 {index} 行缺少标签列 {}", self.labels_col))
        })
    }

    /// 标签编码器
    pub fn codec(&self) -> &LabelCodec {
        &self.codec
    }

    /// 类别数量（即编码表大小）
    pub fn num_classes(&self) -> usize {
        self.codec.len()
    }

    /// 本数据集对应的划分
    pub fn split(&self) -> Split {
        self.split
    }

    /// 标签列索引
    pub fn labels_col(&self) -> usize {
        self.labels_col
    }

    fn record(&self, index: usize) -> Result<&StringRecord, DataError> {
        self.records.get(index).ok_or(DataError::IndexOutOfBounds {
            index,
            len: self.records.len(),
        })
    }
}

/// [`ImageCsvDataset`] 的构建器
///
/// 链式设置选项后调用 [`build`](ImageCsvDatasetBuilder::build) 完成构建：
/// 加载清单 → 划分过滤 → 可选打乱 → 构建标签编码器 → 可选急切翻译。
pub struct ImageCsvDatasetBuilder {
    manifest_path: PathBuf,
    image_root: PathBuf,
    labels_col: usize,
    split: Split,
    shuffle: bool,
    seed: Option<u64>,
    codec_order: CodecOrder,
    label_mode: LabelMode,
    transform: Option<ImageTransform>,
    label_transform: Option<LabelTransform>,
}

impl ImageCsvDatasetBuilder {
    /// 创建构建器，选项取默认值
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(manifest_path: P, image_root: Q) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
            image_root: image_root.as_ref().to_path_buf(),
            labels_col: 1,
            split: Split::Train,
            shuffle: false,
            seed: None,
            codec_order: CodecOrder::default(),
            label_mode: LabelMode::default(),
            transform: None,
            label_transform: None,
        }
    }

    /// 设置标签列索引（默认 1）
    pub fn labels_col(mut self, labels_col: usize) -> Self {
        self.labels_col = labels_col;
        self
    }

    /// 设置划分（默认训练集）
    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// 设置是否打乱行顺序（默认不打乱）
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置打乱用的随机种子（不设置则使用非确定性种子）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 设置编码分配顺序（默认按首次出现顺序）
    pub fn codec_order(mut self, order: CodecOrder) -> Self {
        self.codec_order = order;
        self
    }

    /// 设置标签翻译模式（默认惰性翻译）
    pub fn label_mode(mut self, mode: LabelMode) -> Self {
        self.label_mode = mode;
        self
    }

    /// 挂载图像变换，访问时应用于解码后的图像
    pub fn transform(mut self, transform: ImageTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// 挂载标签变换，惰性模式下访问时应用于原始标签
    ///
    /// 急切模式下标签已在构建时翻译为编码，该变换不会被调用。
    pub fn label_transform(mut self, label_transform: LabelTransform) -> Self {
        self.label_transform = Some(label_transform);
        self
    }

    /// 完成构建
    ///
    /// # 返回
    /// - 清单缺失或不合法返回相应的 `DataError`
    /// - 标签列超出某行的列数返回 `DataError::ManifestError`
    pub fn build(self) -> Result<ImageCsvDataset, DataError> {
        let manifest = Manifest::load(&self.manifest_path)?;
        let mut records = manifest.split_records(self.split)?;

        if self.shuffle {
            if let Some(seed) = self.seed {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                records.shuffle(&mut rng);
            } else {
                let mut rng = rand::thread_rng();
                records.shuffle(&mut rng);
            }
        }

        // 收集标签列，顺带校验每一行都有该列
        let mut raw_labels = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let label = record.get(self.labels_col).ok_or_else(|| {
                DataError::ManifestError(format!("第 {i} 行缺少标签列 {}", self.labels_col))
            })?;
            raw_labels.push(label);
        }

        // 编码器只基于过滤（且可能已打乱）后的划分构建
        let codec = LabelCodec::from_labels(raw_labels.iter().copied(), self.codec_order);

        let eager_codes = match self.label_mode {
            LabelMode::EagerTranslate => raw_labels
                .iter()
                .map(|label| codec.encode(label))
                .collect::<Result<Vec<_>, _>>()?,
            LabelMode::LazyTranslate => Vec::new(),
        };

        Ok(ImageCsvDataset {
            image_root: self.image_root,
            records,
            eager_codes,
            labels_col: self.labels_col,
            split: self.split,
            codec,
            label_mode: self.label_mode,
            transform: self.transform,
            label_transform: self.label_transform,
        })
    }
}
