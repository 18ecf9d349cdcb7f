//! Parser Module
//!
//! 入力ファイルを読み込み、カテゴリ（ページ）ごとの行データへ変換する。
//! ワークブック（xlsx/xls/ods）は calamine で、単一ページのCSVは csv クレートで読み込みます。

mod csv_input;
mod workbook;

use std::path::Path;
use tracing::{info, warn};

use crate::defaults::ColumnNames;
use crate::error::CatalogError;
use crate::types::{CategoryPage, CellValue, RawRow};

pub(crate) use csv_input::read_csv_page;
pub(crate) use workbook::WorkbookParser;

/// 入力ファイルの最大サイズ（バイト）
pub(crate) const MAX_INPUT_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// 入力ファイルを読み込み、すべてのページを返す
///
/// 拡張子が `.csv` の場合はファイル名（拡張子なし）をカテゴリ名とする単一ページ、
/// それ以外はワークブックとしてすべてのシートを読み込みます。
pub(crate) fn read_pages(
    path: &Path,
    columns: &ColumnNames,
) -> Result<Vec<CategoryPage>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::InputMissing(path.to_path_buf()));
    }

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        info!(path = %path.display(), "reading CSV file as a single page");
        Ok(vec![read_csv_page(path, columns)?])
    } else {
        info!(path = %path.display(), "reading workbook, all sheets");
        WorkbookParser::open(path)?.read_pages(columns)
    }
}

/// ヘッダー名の比較用の正規化（前後の空白除去、大文字化、小数点の`,`を`.`に統一）
fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase().replace(',', ".")
}

/// ヘッダー行から求めた各列の位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ColumnIndex {
    pub product: Option<usize>,
    pub base_price: Option<usize>,
    pub tax_rate: Option<usize>,
    pub total: Option<usize>,
}

impl ColumnIndex {
    /// ヘッダー行から列の位置を求める。同名の列が複数ある場合は最初の列を使う
    pub fn from_headers(headers: &[String], columns: &ColumnNames) -> Self {
        let find = |name: &str| {
            let wanted = normalize_header(name);
            headers.iter().position(|h| normalize_header(h) == wanted)
        };

        Self {
            product: find(&columns.product),
            base_price: find(&columns.base_price),
            tax_rate: find(&columns.tax_rate),
            total: find(&columns.total),
        }
    }

    /// 1行分のセルから `RawRow` を組み立てる
    pub fn build_row(&self, position: usize, cells: &[CellValue]) -> RawRow {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| cells.get(i))
                .cloned()
                .unwrap_or(CellValue::Empty)
        };

        let product_name = match cell(self.product) {
            name if name.is_empty() => String::new(),
            CellValue::Text(s) => s,
            other => other.as_raw_string(),
        };

        RawRow {
            position,
            product_name,
            base_price: cell(self.base_price),
            tax_rate: cell(self.tax_rate),
            total_price: cell(self.total),
        }
    }
}

/// ページの構造を検証し、結果をログに出力する
///
/// 商品名の列がない場合は `false` を返し、そのページは読み飛ばされます。
/// その他の列の欠落は警告のみです。
pub(crate) fn verify_structure(
    page_name: &str,
    headers: &[String],
    index: &ColumnIndex,
    columns: &ColumnNames,
    row_count: usize,
) -> bool {
    info!(page = page_name, rows = row_count, columns = ?headers, "verifying page structure");

    let found = [index.product, index.base_price, index.tax_rate, index.total];
    let missing: Vec<&str> = columns
        .expected()
        .into_iter()
        .zip(found)
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name)
        .collect();

    if !missing.is_empty() {
        warn!(page = page_name, ?missing, "page is missing expected columns");
    }

    if index.product.is_none() {
        warn!(
            page = page_name,
            column = %columns.product,
            "product column not found, skipping page"
        );
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_index_from_headers() {
        let columns = ColumnNames::default();
        let index = ColumnIndex::from_headers(
            &headers(&[" producto ", "PRECIO", "0.3", "Total"]),
            &columns,
        );
        assert_eq!(
            index,
            ColumnIndex {
                product: Some(0),
                base_price: Some(1),
                tax_rate: Some(2),
                total: Some(3),
            }
        );
    }

    #[test]
    fn test_column_index_missing_columns() {
        let columns = ColumnNames::default();
        let index = ColumnIndex::from_headers(&headers(&["TOTAL", "PRODUCTO"]), &columns);
        assert_eq!(index.product, Some(1));
        assert_eq!(index.total, Some(0));
        assert_eq!(index.base_price, None);
        assert!(verify_structure("P", &headers(&["TOTAL", "PRODUCTO"]), &index, &columns, 0));
    }

    #[test]
    fn test_verify_structure_without_product_column() {
        let columns = ColumnNames::default();
        let hdrs = headers(&["NOMBRE", "TOTAL"]);
        let index = ColumnIndex::from_headers(&hdrs, &columns);
        assert!(!verify_structure("P", &hdrs, &index, &columns, 3));
    }

    #[test]
    fn test_build_row() {
        let columns = ColumnNames::default();
        let index = ColumnIndex::from_headers(
            &headers(&["PRODUCTO", "PRECIO", "0,3", "TOTAL"]),
            &columns,
        );
        let cells = vec![
            CellValue::Text("BITS DORITOS".to_string()),
            CellValue::Number(1.25),
            CellValue::Number(0.3),
        ];

        let row = index.build_row(2, &cells);
        assert_eq!(row.position, 2);
        assert_eq!(row.product_name, "BITS DORITOS");
        assert_eq!(row.base_price, CellValue::Number(1.25));
        assert_eq!(row.tax_rate, CellValue::Number(0.3));
        // 行が短い場合は空セル扱い
        assert_eq!(row.total_price, CellValue::Empty);
    }

    #[test]
    fn test_build_row_blank_product_name() {
        let columns = ColumnNames::default();
        let index = ColumnIndex::from_headers(&headers(&["PRODUCTO", "TOTAL"]), &columns);

        let row = index.build_row(3, &[CellValue::Text("   ".to_string()), 1.03.into()]);
        assert_eq!(row.product_name, "");
        assert!(!row.has_name());
    }

    #[test]
    fn test_build_row_numeric_product_name() {
        let index = ColumnIndex {
            product: Some(0),
            ..ColumnIndex::default()
        };
        let row = index.build_row(5, &[CellValue::Number(7.0)]);
        assert_eq!(row.product_name, "7");
    }

    #[test]
    fn test_read_pages_missing_input() {
        let result = read_pages(Path::new("no/such/Productos.xlsx"), &ColumnNames::default());
        assert!(matches!(result, Err(CatalogError::InputMissing(_))));
    }
}
