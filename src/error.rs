//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;
use thiserror::Error;

/// xlsxwooクレート全体で使用するエラー型
///
/// 致命的なエラー（入力ファイルが存在しない、出力の書き込みに失敗した等）は
/// 呼び出し元へ伝播します。行単位の不正値や画像取得の失敗はこの型で表現されますが、
/// 変換処理の内部で吸収され、実行全体を中断することはありません。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxwoo::CatalogError;
/// use std::fs::File;
///
/// fn open_inventory(path: &str) -> Result<(), CatalogError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// CSVの読み書き中に発生したエラー
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSONのシリアライズ・デシリアライズエラー（画像キャッシュ、既定値テーブル）
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIPアーカイブの作成エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// HTTP通信のエラー（画像のダウンロード）
    #[error("HTTP error: {0}")]
    Http(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、サンプル件数が0の場合や、税率係数が0以下の場合などです。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxwoo::{ConverterBuilder, CatalogError, RunMode};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_run_mode(RunMode::Sample { cap: 0 })
    ///     .build();
    ///
    /// match result {
    ///     Err(CatalogError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力ファイルが存在しない
    #[error("Input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    /// 商品画像の解決に失敗したエラー
    ///
    /// 画像リゾルバーの内部でのみ発生し、ログに記録された後に吸収されます。
    #[error("Image resolution failed for '{name}': {message}")]
    Image {
        /// 商品名
        name: String,
        /// エラーの詳細メッセージ
        message: String,
    },
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Http(err.to_string())
    }
}

impl From<zip::result::ZipError> for CatalogError {
    fn from(err: zip::result::ZipError) -> Self {
        CatalogError::Zip(err.to_string())
    }
}
