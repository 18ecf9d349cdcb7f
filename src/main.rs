//! xlsxwoo CLI
//!
//! 在庫ワークブックをWooCommerceのインポート用CSVへ変換するコマンドラインツール。

use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use xlsxwoo::{
    default_output_name, CatalogError, ConverterBuilder, ImageMode, RunMode, DEFAULT_SAMPLE_CAP,
};

/// 画像のダウンロード先
const IMAGE_DIR: &str = "product_images";

/// Convert a multi-sheet inventory workbook into a WooCommerce import CSV.
#[derive(Debug, Parser)]
#[command(name = "xlsxwoo", version, about)]
struct Cli {
    /// Inventory workbook (.xlsx/.xls/.ods) or single-page .csv
    #[arg(default_value = "Productos.xlsx")]
    input: PathBuf,

    /// Output CSV (default: productos_woocommerce_YYYYMMDD_HHMMSS.csv)
    output: Option<PathBuf>,

    /// Sample mode: convert at most 100 products spread across categories
    #[arg(short = 'e', long = "ejemplo", visible_alias = "sample")]
    sample: bool,

    /// Download a placeholder image per product into product_images/
    #[arg(short = 'i', long = "imagenes", visible_alias = "images")]
    images: bool,
}

fn main() -> ExitCode {
    xlsxwoo::init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CatalogError> {
    let run_mode = if cli.sample {
        RunMode::Sample {
            cap: DEFAULT_SAMPLE_CAP,
        }
    } else {
        RunMode::Full
    };
    let image_mode = if cli.images {
        ImageMode::Download {
            dir: PathBuf::from(IMAGE_DIR),
        }
    } else {
        ImageMode::Disabled
    };

    let converter = ConverterBuilder::new()
        .with_run_mode(run_mode)
        .with_image_mode(image_mode)
        .build()?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_name(Local::now()));

    let summary = converter.convert_file(&cli.input, &output)?;
    summary.log();
    info!(path = %output.display(), "ready to import into WooCommerce");
    if cli.images {
        info!("run pack-images to bundle {}/ for upload", IMAGE_DIR);
    }

    Ok(())
}

fn report(err: &CatalogError) {
    match err {
        CatalogError::InputMissing(path) => {
            error!(
                path = %path.display(),
                "input file not found; place the workbook next to the tool or pass its path"
            );
        }
        CatalogError::Parse(e) => {
            error!(error = %e, "the file is not a readable spreadsheet or is corrupted");
        }
        CatalogError::Io(e) => {
            error!(error = %e, "I/O error while reading input or writing output");
        }
        other => error!(error = %other, "conversion failed"),
    }
}
