//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::{ImageMode, RunMode};
use crate::defaults::{CatalogDefaults, ColumnNames};
use crate::error::CatalogError;
use crate::images::{
    DownloadSource, ImageCache, ImageResolver, ImageSource, PlaceholderSource, ResolveStats,
    DEFAULT_CACHE_FILE,
};
use crate::normalizer::RowNormalizer;
use crate::summary::ConversionSummary;
use crate::types::{CategoryPage, OutputRecord};

/// 画像キャッシュを書き出す既定の間隔（新規解決の件数）
const DEFAULT_FLUSH_EVERY: usize = 10;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 全件 / サンプル
    pub run_mode: RunMode,

    /// 画像解決の方式
    pub image_mode: ImageMode,

    /// 出力レコードの固定値
    pub defaults: CatalogDefaults,

    /// 入力シートの列名
    pub columns: ColumnNames,

    /// 画像キャッシュファイルのパス
    pub cache_path: PathBuf,

    /// 画像キャッシュを書き出す間隔
    pub flush_every: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Full,
            image_mode: ImageMode::Disabled,
            defaults: CatalogDefaults::default(),
            columns: ColumnNames::default(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            flush_every: DEFAULT_FLUSH_EVERY,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxwoo::{ConverterBuilder, ImageMode, RunMode};
///
/// # fn main() -> Result<(), xlsxwoo::CatalogError> {
/// let converter = ConverterBuilder::new()
///     .with_run_mode(RunMode::Sample { cap: 100 })
///     .with_image_mode(ImageMode::Placeholder)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 全件変換
    /// - 画像解決なし
    /// - 固定値: `CatalogDefaults::default()`（在庫100、しきい値5、税込み係数1.03 など）
    /// - 列名: `PRODUCTO` / `PRECIO` / `0,3` / `TOTAL`
    /// - 画像キャッシュ: `image_cache.json`、10件ごとに書き出し
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 全件変換かサンプル変換かを指定する
    pub fn with_run_mode(mut self, mode: RunMode) -> Self {
        self.config.run_mode = mode;
        self
    }

    /// 画像解決の方式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxwoo::{ConverterBuilder, ImageMode};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_image_mode(ImageMode::Download { dir: "product_images".into() });
    /// ```
    pub fn with_image_mode(mut self, mode: ImageMode) -> Self {
        self.config.image_mode = mode;
        self
    }

    /// 出力レコードの固定値テーブルを差し替える
    pub fn with_defaults(mut self, defaults: CatalogDefaults) -> Self {
        self.config.defaults = defaults;
        self
    }

    /// 入力シートの列名を差し替える
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.config.columns = columns;
        self
    }

    /// 画像キャッシュファイルのパスを指定する
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cache_path = path.into();
        self
    }

    /// 画像キャッシュを書き出す間隔（新規解決の件数）を指定する
    pub fn with_flush_every(mut self, every: usize) -> Self {
        self.config.flush_every = every;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `CatalogError::Config(String)`: 設定の検証に失敗した場合
    ///   * サンプル件数が0
    ///   * 税込み係数が0以下、代替価格が負
    ///   * キャッシュの書き出し間隔が0
    pub fn build(self) -> Result<Converter, CatalogError> {
        if let RunMode::Sample { cap } = self.config.run_mode {
            if cap == 0 {
                return Err(CatalogError::Config(
                    "Sample size must be greater than 0".to_string(),
                ));
            }
        }

        self.config.defaults.validate()?;

        if self.config.flush_every == 0 {
            return Err(CatalogError::Config(
                "Cache flush interval must be greater than 0".to_string(),
            ));
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// 読み込み → （サンプル選択）→ 正規化 → （画像解決）→ CSV出力 の順に処理します。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::Path;
/// use xlsxwoo::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxwoo::CatalogError> {
/// let converter = ConverterBuilder::new().build()?;
/// let summary = converter.convert_file(Path::new("Productos.xlsx"), Path::new("productos.csv"))?;
/// println!("{} productos", summary.total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    config: ConversionConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// 入力ファイルを読み込み、ページの列を返す
    ///
    /// # 戻り値
    ///
    /// * `Err(CatalogError::InputMissing)` - 入力ファイルが存在しない場合
    /// * `Err(CatalogError::Parse)` / `Err(CatalogError::Csv)` - 解析に失敗した場合
    pub fn read_pages(&self, input: &Path) -> Result<Vec<CategoryPage>, CatalogError> {
        crate::parser::read_pages(input, &self.config.columns)
    }

    /// ページを正規化する。サンプルモードの場合は先に行を選ぶ
    pub fn normalize(&self, pages: &[CategoryPage]) -> Vec<OutputRecord> {
        let normalizer = RowNormalizer::new(&self.config.defaults);

        match self.config.run_mode {
            RunMode::Full => normalizer.normalize_pages(pages),
            RunMode::Sample { cap } => {
                let sample = crate::sampling::select_sample(pages, cap);
                info!(cap, categories = sample.len(), "sample mode");
                normalizer.normalize_pages(&sample)
            }
        }
    }

    /// 画像の場所を解決する。画像解決が無効の場合は `None`
    ///
    /// 個々の画像の失敗は吸収され、該当レコードの`images`は空のままになります。
    pub fn resolve_images(&self, records: &mut [OutputRecord]) -> Option<ResolveStats> {
        match &self.config.image_mode {
            ImageMode::Disabled => None,
            ImageMode::Placeholder => Some(self.resolve_with(PlaceholderSource, records)),
            ImageMode::Download { dir } => match DownloadSource::new(dir) {
                Ok(source) => Some(self.resolve_with(source, records)),
                Err(e) => {
                    tracing::warn!(error = %e, "image downloads unavailable, leaving images empty");
                    Some(ResolveStats::default())
                }
            },
        }
    }

    /// 任意の取得元で画像を解決する
    pub fn resolve_with<S: ImageSource>(
        &self,
        source: S,
        records: &mut [OutputRecord],
    ) -> ResolveStats {
        let cache = ImageCache::load(&self.config.cache_path);
        info!(cached = cache.len(), products = records.len(), "resolving images");

        let mut resolver = ImageResolver::new(source, cache, self.config.flush_every);
        resolver.resolve_all(records);
        resolver.finish()
    }

    /// 入力ファイルを変換し、CSVファイルを書き出す
    ///
    /// 入力の読み込みに失敗した場合、出力ファイルは作成されません。
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ConversionSummary, CatalogError> {
        let pages = self.read_pages(input)?;
        info!(pages = pages.len(), "workbook loaded");

        let mut records = self.normalize(&pages);
        let image_stats = self.resolve_images(&mut records);

        crate::output::write_records_to_path(&records, output)?;
        info!(path = %output.display(), products = records.len(), "CSV written");

        Ok(ConversionSummary::from_records(&records, image_stats))
    }
}
