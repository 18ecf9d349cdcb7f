//! Output Module
//!
//! 正規化済みレコードをWooCommerceインポート用のCSVとして書き出すモジュール。
//! UTF-8（BOM付き）、カンマ区切り、ヘッダー行付きで出力します。

mod columns;

pub use columns::WOOCOMMERCE_COLUMNS;

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::CatalogError;
use crate::types::OutputRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 既定の出力ファイル名（`productos_woocommerce_YYYYMMDD_HHMMSS.csv`）
pub fn default_output_name(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "productos_woocommerce_{}.csv",
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// レコードをCSVとして書き出す
///
/// # 引数
///
/// * `records` - 出力するレコード
/// * `writer` - 出力先のライター
pub fn write_records<W: Write>(
    records: &[OutputRecord],
    mut writer: W,
) -> Result<(), CatalogError> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(WOOCOMMERCE_COLUMNS)?;
    for record in records {
        csv_writer.write_record(columns::record_to_row(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// レコードをファイルへ書き出す
pub fn write_records_to_path(records: &[OutputRecord], path: &Path) -> Result<(), CatalogError> {
    let file = File::create(path)?;
    write_records(records, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::CatalogDefaults;
    use crate::normalizer::RowNormalizer;
    use crate::types::{CellValue, RawRow};
    use chrono::TimeZone;

    fn sample_record() -> OutputRecord {
        let defaults = CatalogDefaults::default();
        let row = RawRow::new(2, "BITS DORITOS", CellValue::Number(1.25), CellValue::Number(1.63));
        RowNormalizer::new(&defaults)
            .normalize_row("PAPAS MATUTANO", &row, 1)
            .unwrap()
    }

    fn write_to_string(records: &[OutputRecord]) -> String {
        let mut buffer = Vec::new();
        write_records(records, &mut buffer).unwrap();
        assert!(buffer.starts_with(UTF8_BOM));
        String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).unwrap()
    }

    #[test]
    fn test_header_row() {
        let output = write_to_string(&[]);
        let header = output.lines().next().unwrap();
        assert!(header.starts_with("ID,Tipo,SKU,GTIN,Nombre,Publicado,"));
        assert!(header.ends_with("Posición,Marcas"));
        assert_eq!(WOOCOMMERCE_COLUMNS.len(), 41);
    }

    #[test]
    fn test_record_row() {
        let output = write_to_string(&[sample_record()]);
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let row = reader.records().next().unwrap().unwrap();

        let get = |name: &str| {
            let idx = headers.iter().position(|h| h == name).unwrap();
            row.get(idx).unwrap().to_string()
        };

        assert_eq!(row.len(), 41);
        assert_eq!(get("ID"), "1");
        assert_eq!(get("Tipo"), "simple");
        assert_eq!(get("SKU"), "PAP-0001");
        assert_eq!(get("Nombre"), "BITS DORITOS");
        assert_eq!(get("Publicado"), "1");
        assert_eq!(get("¿Está destacado?"), "0");
        assert_eq!(get("Precio normal"), "1.58");
        assert_eq!(get("Categorías"), "PAPAS MATUTANO");
        assert_eq!(get("Etiquetas"), "papas-matutano");
        assert_eq!(get("Inventario"), "100");
        assert_eq!(get("Cantidad de bajo inventario"), "5");
        assert_eq!(get("Imágenes"), "");
        assert_eq!(get("Posición"), "1");
    }

    #[test]
    fn test_fallback_price_has_two_decimals() {
        let mut record = sample_record();
        record.regular_price = 0.0;
        let output = write_to_string(&[record]);
        assert!(output.contains(",0.00,"));
    }

    #[test]
    fn test_default_output_name() {
        let now = Local.with_ymd_and_hms(2025, 7, 7, 18, 49, 57).unwrap();
        assert_eq!(
            default_output_name(now),
            PathBuf::from("productos_woocommerce_20250707_184957.csv")
        );
    }

    #[test]
    fn test_write_records_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records_to_path(&[sample_record()], &path).unwrap();
        let content = std::fs::read(&path).unwrap();
        assert!(content.starts_with(UTF8_BOM));
    }

    #[test]
    fn test_write_records_to_missing_dir_fails() {
        let result = write_records_to_path(&[], Path::new("/no/such/dir/out.csv"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
