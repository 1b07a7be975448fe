//! 下载与解压单元测试
//!
//! 归档在临时目录内现场生成，涉及网络的用例只访问本机必然拒绝连接的端口，
//! 因此全部测试可离线运行。

use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::datasets::default_data_dir;
use crate::download::{compute_md5, download_file, ensure_dataset, extract_archive};
use crate::error::DataError;

/// 在 archive_path 生成一个 tgz 归档，内含 `<folder_name>/` 下的若干文本文件
fn make_tgz(archive_path: &Path, folder_name: &str, files: &[(&str, &str)]) {
    let src = tempfile::tempdir().expect("创建临时目录失败");
    let folder = src.path().join(folder_name);
    std::fs::create_dir_all(&folder).expect("创建归档源目录失败");
    for (name, content) in files {
        std::fs::write(folder.join(name), content).expect("写出归档源文件失败");
    }

    let tar_gz = File::create(archive_path).expect("创建归档文件失败");
    let encoder = GzEncoder::new(tar_gz, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder
        .append_dir_all(folder_name, &folder)
        .expect("打包目录失败");
    let encoder = builder.into_inner().expect("结束打包失败");
    encoder.finish().expect("结束压缩失败");
}

#[test]
fn test_default_data_dir() {
    let dir = default_data_dir();
    assert!(dir.to_string_lossy().contains("only_vision"));
    assert!(dir.to_string_lossy().contains("datasets"));
}

#[test]
fn test_compute_md5() {
    assert_eq!(compute_md5(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn test_download_file_unreachable_host() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let dest = dir.path().join("x.tgz");

    // 端口 1 不会有服务监听，连接会立刻被拒绝
    let result = download_file("http://127.0.0.1:1/x.tgz", &dest, None);
    assert!(matches!(result, Err(DataError::DownloadError(_))));
    assert!(!dest.exists());
}

#[test]
fn test_extract_archive_roundtrip() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let archive_path = dir.path().join("sample.tgz");
    make_tgz(&archive_path, "sample", &[("hello.txt", "你好"), ("b.txt", "b")]);

    let dest = tempfile::tempdir().expect("创建临时目录失败");
    extract_archive(&archive_path, dest.path()).expect("解压失败");

    let extracted = dest.path().join("sample");
    assert!(extracted.join("hello.txt").exists());
    assert!(extracted.join("b.txt").exists());
    assert_eq!(
        std::fs::read_to_string(extracted.join("hello.txt")).unwrap(),
        "你好"
    );
}

#[test]
fn test_extract_archive_unsupported_extension() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let archive_path = dir.path().join("sample.zip");
    std::fs::write(&archive_path, b"whatever").expect("写出文件失败");

    let result = extract_archive(&archive_path, dir.path());
    assert!(matches!(result, Err(DataError::ExtractionError(_))));
}

#[test]
fn test_extract_archive_missing_file() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let result = extract_archive(&dir.path().join("ghost.tgz"), dir.path());
    assert!(matches!(result, Err(DataError::FileNotFound(_))));
}

#[test]
fn test_extract_archive_corrupt() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let archive_path = dir.path().join("broken.tgz");
    std::fs::write(&archive_path, b"definitely not gzip").expect("写出文件失败");

    let result = extract_archive(&archive_path, dir.path());
    assert!(matches!(result, Err(DataError::ExtractionError(_))));
}

#[test]
fn test_ensure_dataset_already_present() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    std::fs::create_dir_all(dir.path().join("imagenette2-160")).expect("创建目录失败");

    // 文件夹已存在时直接返回，URL 指向拒绝连接的地址也不会被访问
    let result = ensure_dataset("http://127.0.0.1:1/imagenette2-160.tgz", dir.path())
        .expect("应直接返回已存在的路径");
    assert_eq!(result, dir.path().join("imagenette2-160"));
}

#[test]
fn test_ensure_dataset_extracts_local_archive() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let archive_path = dir.path().join("mini.tgz");
    make_tgz(&archive_path, "mini", &[("data.txt", "42")]);

    // 归档已在本地，下载被跳过
    let result = ensure_dataset("http://127.0.0.1:1/mini.tgz", dir.path()).expect("解压失败");

    assert_eq!(result, dir.path().join("mini"));
    assert!(result.join("data.txt").exists());
    // 解压成功后归档文件被删除
    assert!(!archive_path.exists());
}

#[test]
fn test_ensure_dataset_idempotent() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let archive_path = dir.path().join("mini.tgz");
    make_tgz(&archive_path, "mini", &[("data.txt", "42")]);

    let first = ensure_dataset("http://127.0.0.1:1/mini.tgz", dir.path()).expect("首次调用失败");
    // 第二次调用既无归档也无网络可用，只能命中存在性检查
    let second =
        ensure_dataset("http://127.0.0.1:1/mini.tgz", dir.path()).expect("重复调用失败");

    assert_eq!(first, second);
}

#[test]
fn test_ensure_dataset_bad_url() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let result = ensure_dataset("http://", dir.path());
    assert!(matches!(result, Err(DataError::DownloadError(_))));
}
