//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::PathBuf;

/// サンプルモードの既定件数
pub const DEFAULT_SAMPLE_CAP: usize = 100;

/// 処理対象の行の選び方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunMode {
    /// すべての行を変換（デフォルト）
    Full,

    /// 件数上限付きのプレビュー（サンプル）モード
    ///
    /// 各カテゴリから `ceil(cap / カテゴリ数)` 行ずつ先頭から選び、全体を `cap` 件に
    /// 切り詰めます。乱数を使わないため、同じ入力からは常に同じサンプルが得られます。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxwoo::{ConverterBuilder, RunMode};
    ///
    /// # fn main() -> Result<(), xlsxwoo::CatalogError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_run_mode(RunMode::Sample { cap: 100 })
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Sample {
        /// 出力する最大件数
        cap: usize,
    },
}

/// 商品画像の解決方式
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageMode {
    /// 画像を解決しない（デフォルト）。`Imágenes`列は空になる
    Disabled,

    /// プレースホルダー画像のURLを生成して記録する（ネットワーク通信なし）
    Placeholder,

    /// プレースホルダー画像をダウンロードし、ローカルパスを記録する
    ///
    /// 例: `ImageMode::Download { dir: "product_images".into() }`
    Download {
        /// 画像の保存先ディレクトリ
        dir: PathBuf,
    },
}

impl ImageMode {
    /// 画像解決が有効かどうか
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ImageMode::Disabled)
    }
}
