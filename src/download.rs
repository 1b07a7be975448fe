//! 数据集下载与解压工具
//!
//! 提供 HTTP 下载、MD5 校验和 tar 归档解压功能，
//! 并在此基础上实现幂等的 [`ensure_dataset`]：同一数据集只会被下载、解压一次。

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use md5::{Digest, Md5};
use tar::Archive;

use crate::error::DataError;

/// 下载文件并保存到指定路径
///
/// # 参数
/// - `url`: 下载地址
/// - `dest_path`: 保存路径
/// - `expected_md5`: 可选的 MD5 校验码，提供时会验证下载内容
///
/// # 返回
/// - 成功返回 `Ok(())`
/// - 网络失败返回 `DataError::DownloadError`，校验失败返回 `DataError::ChecksumMismatch`
pub fn download_file(
    url: &str,
    dest_path: &Path,
    expected_md5: Option<&str>,
) -> Result<(), DataError> {
    println!("正在下载 {url} ...");

    let response = ureq::get(url)
        .call()
        .map_err(|e| DataError::DownloadError(format!("HTTP 请求失败: {e}")))?;

    if response.status() != 200 {
        return Err(DataError::DownloadError(format!(
            "HTTP 状态码: {}",
            response.status()
        )));
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| DataError::DownloadError(format!("读取响应失败: {e}")))?;

    // MD5 校验（如果提供了预期值）
    if let Some(expected) = expected_md5 {
        let actual = compute_md5(&bytes);
        if actual != expected {
            return Err(DataError::ChecksumMismatch {
                expected: expected.to_string(),
                got: actual,
            });
        }
        println!("MD5 校验通过: {actual}");
    }

    std::fs::write(dest_path, &bytes).map_err(DataError::IoError)?;

    println!("下载完成: {dest_path:?}");
    Ok(())
}

/// 计算数据的 MD5 校验码
pub fn compute_md5(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// 将 tar 归档解压到指定目录
///
/// 根据扩展名选择解压方式：
/// - `.tgz` / `.gz`: gzip 压缩的 tar 归档
/// - `.tar`: 未压缩的 tar 归档
///
/// 其余扩展名返回 `DataError::ExtractionError`。
/// 解压失败时已写出的文件会保留在原地，不做回滚。
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<(), DataError> {
    let ext = archive_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::open(archive_path)
        .map_err(|_| DataError::FileNotFound(archive_path.to_path_buf()))?;

    println!("正在解压 {archive_path:?} ...");

    match ext.as_str() {
        "tgz" | "gz" => {
            let mut archive = Archive::new(GzDecoder::new(file));
            archive
                .unpack(dest_dir)
                .map_err(|e| DataError::ExtractionError(format!("解压 gzip 归档失败: {e}")))?;
        }
        "tar" => {
            let mut archive = Archive::new(file);
            archive
                .unpack(dest_dir)
                .map_err(|e| DataError::ExtractionError(format!("解压 tar 归档失败: {e}")))?;
        }
        other => {
            return Err(DataError::ExtractionError(format!(
                "不支持的归档格式: .{other}"
            )));
        }
    }

    println!("解压完成: {dest_dir:?}");
    Ok(())
}

/// 确保数据集在本地存在，必要时下载并解压
///
/// 目标文件夹名取 URL 最后一段路径去掉扩展名（`imagenette2-160.tgz` → `imagenette2-160`）。
///
/// # 参数
/// - `url`: 归档下载地址
/// - `dest_dir`: 数据集存放目录
///
/// # 返回
/// 解压后数据集目录的路径
///
/// # 幂等性
/// 若 `dest_dir/<文件夹名>` 已存在则直接返回该路径，不发起任何网络请求，
/// 可安全地重复调用。归档下载到 `dest_dir` 内，解压成功后删除。
///
/// 注意：多个调用方同时对同一目录调用本函数会在存在性检查上竞争，
/// 需要调用方自行加锁串行化。
pub fn ensure_dataset(url: &str, dest_dir: &Path) -> Result<PathBuf, DataError> {
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DataError::DownloadError(format!("无法从 URL 解析文件名: {url}")))?;

    let folder_name = Path::new(file_name)
        .file_stem()
        .ok_or_else(|| DataError::DownloadError(format!("无法从 URL 解析文件夹名: {url}")))?;

    let final_path = dest_dir.join(folder_name);
    if final_path.exists() {
        println!("{} 文件夹已存在: {final_path:?}", folder_name.to_string_lossy());
        return Ok(final_path);
    }

    std::fs::create_dir_all(dest_dir).map_err(DataError::IoError)?;

    // 若归档文件已在本地则跳过下载
    let archive_path = dest_dir.join(file_name);
    if !archive_path.exists() {
        download_file(url, &archive_path, None)?;
    }

    extract_archive(&archive_path, dest_dir)?;

    // 解压成功后删除归档文件
    std::fs::remove_file(&archive_path).map_err(DataError::IoError)?;

    Ok(final_path)
}
