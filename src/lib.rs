//! xlsxwoo - Pure-Rust inventory workbook to WooCommerce CSV converter
//!
//! This crate reads a multi-sheet inventory workbook (one sheet per product
//! category, one row per product) and writes a single CSV file in the
//! WooCommerce product-import format. Prices are derived from the tax-inclusive
//! `TOTAL` column, with a fallback policy for malformed cells, and product images
//! can optionally be resolved through a persisted cache.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxwoo::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Convert every sheet of the workbook
//!     let summary = converter.convert_file(
//!         Path::new("Productos.xlsx"),
//!         Path::new("productos_woocommerce.csv"),
//!     )?;
//!     println!("{} products", summary.total);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Sample Mode and Images
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxwoo::{ConverterBuilder, ImageMode, RunMode};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_run_mode(RunMode::Sample { cap: 100 })  // at most 100 products
//!         .with_image_mode(ImageMode::Placeholder)       // placeholder image URLs
//!         .build()?;
//!
//!     converter.convert_file(Path::new("Productos.xlsx"), Path::new("muestra.csv"))?;
//!     Ok(())
//! }
//! ```
//!
//! # Step by Step
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxwoo::{write_records, ConverterBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let pages = converter.read_pages(Path::new("Productos.xlsx"))?;
//!     let records = converter.normalize(&pages);
//!     write_records(&records, std::io::stdout())?;
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod defaults;
mod error;
mod images;
mod normalizer;
mod output;
mod package;
mod parser;
mod sampling;
mod summary;
mod types;

// 公開API
pub use api::{ImageMode, RunMode, DEFAULT_SAMPLE_CAP};
pub use builder::{Converter, ConverterBuilder};
pub use defaults::{CatalogDefaults, ColumnNames};
pub use error::CatalogError;
pub use images::{
    cache_key, DownloadSource, ImageCache, ImageCacheEntry, ImageResolver, ImageSource,
    PlaceholderSource, ResolveStats, DEFAULT_CACHE_FILE,
};
pub use normalizer::RowNormalizer;
pub use output::{default_output_name, write_records, write_records_to_path, WOOCOMMERCE_COLUMNS};
pub use package::{default_package_name, list_images, package_images};
pub use summary::{ConversionSummary, PriceStats};
pub use types::{CategoryPage, CellValue, OutputRecord, PriceSource, RawRow};

/// tracing のサブスクライバーを初期化する（バイナリ用）
///
/// `RUST_LOG` 環境変数でフィルタを指定できます。未指定の場合は `info` です。
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 既に初期化済みの場合は何もしない
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
