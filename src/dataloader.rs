//! DataLoader - PyTorch 风格的数据批量加载器
//!
//! 提供统一的数据迭代 API，支持：
//! - 自动分批 (batch_size)
//! - 随机打乱 (shuffle)
//! - 丢弃不完整批次 (drop_last)

use image::RgbImage;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::datasets::ImageCsvDataset;
use crate::error::DataError;
use crate::transforms::Label;

/// 一个批次的样本
pub type Batch = Vec<(RgbImage, Label)>;

/// DataLoader - PyTorch 风格的数据批量加载器
///
/// 图像在迭代时才从磁盘解码，访问失败的批次以 `Err` 形式产出。
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(&dataset, 32)
///     .shuffle(true)
///     .seed(42);
///
/// for batch in loader.iter() {
///     let batch = batch?;
///     for (image, label) in batch {
///         // ...
///     }
/// }
/// ```
pub struct DataLoader<'a> {
    dataset: &'a ImageCsvDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
}

impl<'a> DataLoader<'a> {
    /// 创建新的 DataLoader
    ///
    /// # 参数
    /// - `dataset`: 已构建好的数据集
    /// - `batch_size`: 批大小
    ///
    /// # Panics
    /// `batch_size` 为 0 时 panic
    pub fn new(dataset: &'a ImageCsvDataset, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size 必须大于 0");
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            (n + self.batch_size - 1) / self.batch_size
        }
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 创建迭代器
    pub fn iter(&self) -> DataLoaderIterator<'_> {
        // 生成索引
        let n = self.dataset.len();
        let mut indices: Vec<usize> = (0..n).collect();

        // 如果需要打乱
        if self.shuffle {
            if let Some(seed) = self.seed {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                indices.shuffle(&mut rng);
            } else {
                let mut rng = rand::thread_rng();
                indices.shuffle(&mut rng);
            }
        }

        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
        }
    }
}

/// DataLoader 迭代器
pub struct DataLoaderIterator<'a> {
    loader: &'a DataLoader<'a>,
    indices: Vec<usize>,
    current_batch: usize,
}

impl<'a> Iterator for DataLoaderIterator<'a> {
    type Item = Result<Batch, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.loader.dataset.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        // 检查是否还有数据
        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);
        let actual_batch_size = end - start;

        // 如果 drop_last 且批次不完整，则跳过
        if self.loader.drop_last && actual_batch_size < batch_size {
            return None;
        }

        self.current_batch += 1;

        // 逐个索引读取样本，任一失败则整个批次以 Err 产出
        let batch_indices = &self.indices[start..end];
        let batch: Result<Batch, DataError> = batch_indices
            .iter()
            .map(|&idx| self.loader.dataset.get(idx))
            .collect();

        Some(batch)
    }
}
