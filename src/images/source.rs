//! Image Sources
//!
//! 商品画像の取得元。プレースホルダーURLの生成と、そのダウンロードを提供する。

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::CatalogError;
use crate::types::OutputRecord;

/// プレースホルダー画像の背景色
const PALETTE: [&str; 8] = [
    "FF6B6B", "4ECDC4", "45B7D1", "FFA07A", "98D8C8", "F7DC6F", "BB8FCE", "85C1E9",
];

/// プレースホルダー画像に載せる文字数
const LABEL_CHARS: usize = 8;

/// ファイル名に付けるキーのハッシュのバイト数（16進で8桁）
const KEY_HASH_BYTES: usize = 4;

const PLACEHOLDER_BASE_URL: &str = "https://dummyimage.com";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// 画像の取得元
///
/// 失敗は `Err` として返し、呼び出し側（リゾルバー）で吸収されます。
pub trait ImageSource {
    /// 商品の画像の場所（URLまたはローカルパス）を返す
    fn fetch(&mut self, key: &str, record: &OutputRecord) -> Result<String, CatalogError>;

    /// キャッシュ済みの場所をこの取得元の結果として再利用できるか
    ///
    /// `false` の場合、キャッシュヒットとして扱わずに取得し直します。
    fn accepts(&self, _location: &str) -> bool {
        true
    }
}

/// 商品名から決まる背景色（SHA-256の先頭バイトでパレットを選ぶ）
pub(crate) fn placeholder_color(name: &str) -> &'static str {
    let digest = Sha256::digest(name.as_bytes());
    PALETTE[digest[0] as usize % PALETTE.len()]
}

/// プレースホルダー画像のパス部分（`/400x400/{COLOR}/ffffff&text={TEXT}`）
fn placeholder_path(name: &str) -> String {
    let label: String = name
        .trim()
        .chars()
        .take(LABEL_CHARS)
        .collect::<String>()
        .to_uppercase();
    let text = label
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+");

    format!("/400x400/{}/ffffff&text={}", placeholder_color(name), text)
}

/// 商品名から決まるプレースホルダー画像のURL
///
/// ```text
/// https://dummyimage.com/400x400/{COLOR}/ffffff&text={TEXT}
/// ```
pub(crate) fn placeholder_url(name: &str) -> String {
    format!("{}{}", PLACEHOLDER_BASE_URL, placeholder_path(name))
}

/// ファイル名に使えるスラッグ（小文字英数字と`-`のみ）
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "producto".to_string()
    } else {
        slug
    }
}

/// キャッシュキーから保存ファイル名を作る（`{slug}-{SHA-256の先頭8桁}.png`）
///
/// スラッグが同じになる別々のキーでもファイル名は衝突しません。
pub(crate) fn image_file_name(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let hash: String = digest
        .iter()
        .take(KEY_HASH_BYTES)
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("{}-{}.png", slugify(key), hash)
}

/// 応答を検証する。2xx 以外、または `image/` 以外のContent-Typeはエラー
pub(crate) fn check_response(
    name: &str,
    url: &str,
    status: reqwest::StatusCode,
    content_type: Option<&str>,
) -> Result<(), CatalogError> {
    if !status.is_success() {
        return Err(CatalogError::Image {
            name: name.to_string(),
            message: format!("GET {} returned {}", url, status),
        });
    }

    if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
        return Err(CatalogError::Image {
            name: name.to_string(),
            message: format!(
                "GET {} did not return an image (content-type: {})",
                url,
                content_type.unwrap_or("none")
            ),
        });
    }

    Ok(())
}

/// プレースホルダー画像のURLをそのまま返す取得元（通信なし）
#[derive(Debug, Default)]
pub struct PlaceholderSource;

impl ImageSource for PlaceholderSource {
    fn fetch(&mut self, _key: &str, record: &OutputRecord) -> Result<String, CatalogError> {
        Ok(placeholder_url(&record.name))
    }

    fn accepts(&self, location: &str) -> bool {
        location.starts_with(PLACEHOLDER_BASE_URL)
    }
}

/// プレースホルダー画像をダウンロードしてローカルに保存する取得元
#[derive(Debug)]
pub struct DownloadSource {
    client: reqwest::blocking::Client,
    dir: PathBuf,
    base_url: String,
}

impl DownloadSource {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            dir: dir.into(),
            base_url: PLACEHOLDER_BASE_URL.to_string(),
        })
    }
}

impl ImageSource for DownloadSource {
    fn fetch(&mut self, key: &str, record: &OutputRecord) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.base_url, placeholder_path(&record.name));
        let response = self.client.get(&url).send()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        check_response(&record.name, &url, response.status(), content_type.as_deref())?;

        let bytes = response.bytes()?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(image_file_name(key));
        fs::write(&path, &bytes)?;

        debug!(
            product = %record.name,
            path = %path.display(),
            bytes = bytes.len(),
            "downloaded image"
        );
        Ok(path.to_string_lossy().into_owned())
    }

    /// 保存先ディレクトリ内に実在するファイルだけを再利用する
    fn accepts(&self, location: &str) -> bool {
        let path = Path::new(location);
        path.starts_with(&self.dir) && path.is_file()
    }
}
