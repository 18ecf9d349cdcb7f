//! CSV Input
//!
//! 単一ページのCSVファイルを読み込む。ファイル名（拡張子なし）がカテゴリ名になります。

use std::io::Read;
use std::path::Path;

use crate::defaults::ColumnNames;
use crate::error::CatalogError;
use crate::parser::{verify_structure, ColumnIndex};
use crate::types::{CategoryPage, CellValue};

/// CSVファイルを1ページとして読み込む
pub(crate) fn read_csv_page(
    path: &Path,
    columns: &ColumnNames,
) -> Result<CategoryPage, CatalogError> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = std::fs::File::open(path)?;
    read_csv_from_reader(&name, file, columns)
}

/// リーダーからCSVを読み込む
///
/// 商品名の列がない場合は行を持たないページを返します。
pub(crate) fn read_csv_from_reader<R: Read>(
    page_name: &str,
    reader: R,
    columns: &ColumnNames,
) -> Result<CategoryPage, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let index = ColumnIndex::from_headers(&headers, columns);

    let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;
    if !verify_structure(page_name, &headers, &index, columns, records.len()) {
        return Ok(CategoryPage::new(page_name, Vec::new()));
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let cells: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect();
            // ヘッダー行が1行目
            index.build_row(idx + 2, &cells)
        })
        .collect();

    Ok(CategoryPage::new(page_name, rows))
}
