//! CSV 清单表
//!
//! 清单文件描述每个样本的相对路径、标签和划分归属：
//! - 第 0 列：图像相对路径
//! - 标签列：默认第 1 列（可配置）
//! - `is_valid` 列：按表头名定位的布尔列，`true` 表示验证集样本
//!
//! 其余列允许存在，会被忽略。

use std::path::Path;

use csv::StringRecord;

use crate::error::DataError;

/// 清单中划分标志列的表头名
pub const IS_VALID_COLUMN: &str = "is_valid";

/// 训练/验证划分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// 训练集（`is_valid` 为 false 的行）
    Train,
    /// 验证集（`is_valid` 为 true 的行）
    Validation,
}

/// 图像清单表
///
/// 从 CSV 文件一次性加载到内存，之后只读。
#[derive(Debug, Clone)]
pub struct Manifest {
    headers: StringRecord,
    records: Vec<StringRecord>,
    is_valid_col: usize,
}

impl Manifest {
    /// 从 CSV 文件加载清单
    ///
    /// # 参数
    /// - `path`: 清单文件路径，首行必须是表头且包含 `is_valid` 列
    ///
    /// # 返回
    /// - 文件缺失返回 `DataError::FileNotFound`
    /// - CSV 无法解析或缺少 `is_valid` 列返回 `DataError::ManifestError`
    pub fn load(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Err(DataError::FileNotFound(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| DataError::ManifestError(format!("读取清单失败: {e}")))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::ManifestError(format!("读取表头失败: {e}")))?
            .clone();

        let is_valid_col = headers
            .iter()
            .position(|h| h == IS_VALID_COLUMN)
            .ok_or_else(|| {
                DataError::ManifestError(format!("清单缺少 `{IS_VALID_COLUMN}` 列"))
            })?;

        let mut records = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| DataError::ManifestError(format!("第 {} 行解析失败: {e}", i + 1)))?;
            records.push(record);
        }

        Ok(Self {
            headers,
            records,
            is_valid_col,
        })
    }

    /// 清单总行数（不含表头）
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 清单是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 表头行
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// 全部数据行
    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    /// 过滤出指定划分的行，按出现顺序从 0 起连续重新编号
    ///
    /// # 返回
    /// `is_valid` 值既不是真也不是假的行返回 `DataError::ManifestError`，
    /// 并带上行号以便定位。
    pub fn split_records(&self, split: Split) -> Result<Vec<StringRecord>, DataError> {
        let mut rows = Vec::new();
        for (i, record) in self.records.iter().enumerate() {
            let flag = record.get(self.is_valid_col).ok_or_else(|| {
                DataError::ManifestError(format!("第 {} 行缺少 `{IS_VALID_COLUMN}` 值", i + 1))
            })?;
            let is_valid = parse_flag(flag).ok_or_else(|| {
                DataError::ManifestError(format!(
                    "第 {} 行的 `{IS_VALID_COLUMN}` 值无法解析: {flag}",
                    i + 1
                ))
            })?;

            let wanted = match split {
                Split::Train => !is_valid,
                Split::Validation => is_valid,
            };
            if wanted {
                rows.push(record.clone());
            }
        }
        Ok(rows)
    }
}

/// 解析划分标志
///
/// 兼容 pandas 风格的 `True`/`False` 以及 `true`/`false`/`1`/`0`。
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
