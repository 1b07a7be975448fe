//! 单元测试
//!
//! 所有测试都在临时目录内自造清单和图像，不依赖网络。

mod download;

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// 在 dir 下生成指定尺寸的纯色图像文件（按扩展名编码）
pub(crate) fn write_image(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 3]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("创建图像目录失败");
    }
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    image.save(&path).expect("写出测试图像失败");
}

/// 在 dir 下写出清单 CSV（表头 `path,label,is_valid`）
///
/// 划分标志按 pandas 风格写成 `True`/`False`。
pub(crate) fn write_manifest(dir: &Path, name: &str, rows: &[(&str, &str, bool)]) -> PathBuf {
    let mut content = String::from("path,label,is_valid\n");
    for (path, label, is_valid) in rows {
        let flag = if *is_valid { "True" } else { "False" };
        content.push_str(&format!("{path},{label},{flag}\n"));
    }
    let path = dir.join(name);
    std::fs::write(&path, content).expect("写出测试清单失败");
    path
}
