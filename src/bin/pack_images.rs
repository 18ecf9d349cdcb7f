//! pack-images
//!
//! ダウンロード済みの商品画像をWordPressアップロード用のZIPにまとめる。

use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use xlsxwoo::{default_package_name, package_images};

/// Bundle product images into a ZIP for upload to /wp-content/uploads/.
#[derive(Debug, Parser)]
#[command(name = "pack-images", version, about)]
struct Cli {
    /// Directory containing the product images
    #[arg(default_value = "product_images")]
    dir: PathBuf,

    /// Output ZIP (default: woocommerce_images_YYYYMMDD_HHMMSS.zip)
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    xlsxwoo::init_logging();
    let cli = Cli::parse();

    let output = cli
        .output
        .unwrap_or_else(|| default_package_name(Local::now()));

    match package_images(&cli.dir, &output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, dir = %cli.dir.display(), "failed to create image package");
            ExitCode::FAILURE
        }
    }
}
