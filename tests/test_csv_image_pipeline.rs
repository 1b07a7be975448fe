//! 端到端流程测试：归档 → 解压 → 清单 → 数据集 → DataLoader
//!
//! 归档在临时目录内现场生成（图像 + CSV 清单），全程离线。

use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use image::{Rgb, RgbImage};

use only_vision::{DataLoader, ImageCsvDataset, Label, LabelMode, Split};

const DATASET_NAME: &str = "tinyset";
const MANIFEST_NAME: &str = "labels.csv";

/// 生成一个模拟数据集归档：两类各 3 张训练图、各 1 张验证图
fn make_dataset_archive(archive_path: &Path) {
    let src = tempfile::tempdir().expect("创建临时目录失败");
    let root = src.path().join(DATASET_NAME);

    let mut manifest = String::from("path,label,is_valid\n");
    for (class, color) in [("cat", [255u8, 0, 0]), ("dog", [0u8, 0, 255])] {
        std::fs::create_dir_all(root.join(class)).expect("创建类别目录失败");
        for i in 0..4 {
            let rel = format!("{class}/{class}_{i}.png");
            let image = RgbImage::from_pixel(4, 4, Rgb(color));
            image.save(root.join(&rel)).expect("写出图像失败");
            // 每类最后一张划入验证集
            let flag = if i == 3 { "True" } else { "False" };
            manifest.push_str(&format!("{rel},{class},{flag}\n"));
        }
    }
    std::fs::write(root.join(MANIFEST_NAME), manifest).expect("写出清单失败");

    let tar_gz = File::create(archive_path).expect("创建归档文件失败");
    let encoder = GzEncoder::new(tar_gz, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder
        .append_dir_all(DATASET_NAME, &root)
        .expect("打包目录失败");
    builder
        .into_inner()
        .expect("结束打包失败")
        .finish()
        .expect("结束压缩失败");
}

#[test]
fn test_full_pipeline() {
    let data_dir = tempfile::tempdir().expect("创建临时目录失败");
    let archive_path = data_dir.path().join(format!("{DATASET_NAME}.tgz"));
    make_dataset_archive(&archive_path);

    // 归档已在本地，ensure_dataset 跳过下载直接解压
    let url = format!("http://127.0.0.1:1/{DATASET_NAME}.tgz");
    let dataset_dir =
        only_vision::ensure_dataset(&url, data_dir.path()).expect("解压数据集失败");
    assert_eq!(dataset_dir, data_dir.path().join(DATASET_NAME));
    assert!(!archive_path.exists(), "解压成功后归档应被删除");

    // 再次调用应幂等返回同一路径
    let again = only_vision::ensure_dataset(&url, data_dir.path()).expect("重复调用失败");
    assert_eq!(again, dataset_dir);

    let manifest_path = dataset_dir.join(MANIFEST_NAME);

    // 训练集：每类 3 张
    let train = ImageCsvDataset::new(&manifest_path, &dataset_dir)
        .split(Split::Train)
        .shuffle(true)
        .seed(42)
        .label_mode(LabelMode::EagerTranslate)
        .build()
        .expect("构建训练集失败");
    assert_eq!(train.len(), 6);
    assert_eq!(train.num_classes(), 2);

    // 验证集：每类 1 张
    let valid = ImageCsvDataset::new(&manifest_path, &dataset_dir)
        .split(Split::Validation)
        .build()
        .expect("构建验证集失败");
    assert_eq!(valid.len(), 2);
    assert_eq!(train.len() + valid.len(), 8);

    // 每个样本都能读出 4x4 RGB 图像和合法编码
    for i in 0..train.len() {
        let (image, label) = train.get(i).expect(&format!("获取样本 {} 失败", i));
        assert_eq!(image.dimensions(), (4, 4));
        let code = label.as_code().expect("急切模式下应得到整数编码");
        assert!(code < train.num_classes());
    }

    // DataLoader 分批遍历全部样本
    let loader = DataLoader::new(&train, 4).shuffle(true).seed(7);
    let mut total = 0;
    for batch in loader.iter() {
        let batch = batch.expect("批次读取失败");
        for (image, label) in batch {
            assert_eq!(image.dimensions(), (4, 4));
            assert!(matches!(label, Label::Code(_)));
            total += 1;
        }
    }
    assert_eq!(total, 6);
}
