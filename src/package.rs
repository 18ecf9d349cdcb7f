//! Image Package Module
//!
//! 商品画像をWordPressへアップロードするためのZIPパッケージを作成する。

use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::CatalogError;

/// パッケージに含める画像の拡張子
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// 既定のパッケージ名（`woocommerce_images_YYYYMMDD_HHMMSS.zip`）
pub fn default_package_name(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "woocommerce_images_{}.zip",
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// ZIPのエントリ名を検証する
///
/// パストラバーサルを防ぐため、空の名前、絶対パス、`..`、`\` を含む名前を拒否します。
pub(crate) fn validate_entry_name(name: &str) -> Result<(), CatalogError> {
    if name.is_empty() {
        return Err(CatalogError::Zip("Empty entry name is not allowed".to_string()));
    }

    if name.starts_with('/') || name.get(1..3) == Some(":\\") {
        return Err(CatalogError::Zip(format!(
            "Absolute path is not allowed: {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(CatalogError::Zip(format!("Path traversal detected: {}", name)));
    }

    if name.contains('\\') {
        return Err(CatalogError::Zip(format!(
            "Backslash in entry name is not allowed: {}",
            name
        )));
    }

    Ok(())
}

/// ディレクトリ内の画像ファイルを名前順に列挙する
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if path.is_file() && is_image {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// 画像ディレクトリをZIPにまとめる。エントリはディレクトリ構造を持たない
///
/// # 戻り値
///
/// * `Ok(usize)` - パッケージに含めた画像の数
/// * `Err(CatalogError::Config)` - 画像が1枚もない場合
pub fn package_images(dir: &Path, output: &Path) -> Result<usize, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::InputMissing(dir.to_path_buf()));
    }

    let images = list_images(dir)?;
    if images.is_empty() {
        return Err(CatalogError::Config(format!(
            "No images found in {}",
            dir.display()
        )));
    }

    let mut zip = ZipWriter::new(BufWriter::new(File::create(output)?));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &images {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate_entry_name(&name)?;

        zip.start_file(name.as_str(), options)?;
        zip.write_all(&fs::read(path)?)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;

    info!(
        package = %output.display(),
        images = images.len(),
        "created image package; extract it into /wp-content/uploads/ before importing the CSV"
    );
    Ok(images.len())
}
