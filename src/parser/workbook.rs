//! Workbook Parser
//!
//! calamineを使用したワークブックの読み込み。各シートを1つのカテゴリとして扱います。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::info;

use crate::defaults::ColumnNames;
use crate::error::CatalogError;
use crate::parser::{verify_structure, ColumnIndex, MAX_INPUT_FILE_SIZE};
use crate::types::{CategoryPage, CellValue};

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// xlsx / xls / ods の判定はファイルの内容から行います。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ファイルを開く
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// リーダーからワークブックを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(CatalogError::Config)` - ファイルサイズが上限を超えた場合
    /// * `Err(CatalogError::Parse)` - ワークブックとして解析できない場合
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        // 上限+1バイトまで読み、超過を検出する
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(MAX_INPUT_FILE_SIZE + 1)
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > MAX_INPUT_FILE_SIZE {
            return Err(CatalogError::Config(format!(
                "Input file size exceeds maximum: {} bytes",
                MAX_INPUT_FILE_SIZE
            )));
        }

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を取得（ワークブック内の順序）
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// すべてのシートをページとして読み込む
    ///
    /// 商品名の列がないシートは警告を出して読み飛ばします。
    pub fn read_pages(&mut self, columns: &ColumnNames) -> Result<Vec<CategoryPage>, CatalogError> {
        let mut pages = Vec::new();

        for sheet_name in self.get_sheet_names() {
            info!(page = %sheet_name, "reading page");
            let range = self.workbook.worksheet_range(&sheet_name)?;
            if let Some(page) = parse_sheet(&sheet_name, &range, columns) {
                pages.push(page);
            }
        }

        Ok(pages)
    }
}

/// calamineのセルを `CellValue` に変換する
fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Empty => CellValue::Empty,
        _ => CellValue::Empty,
    }
}

/// 1シートを解析する。先頭行をヘッダーとして扱う
fn parse_sheet(
    sheet_name: &str,
    range: &Range<Data>,
    columns: &ColumnNames,
) -> Option<CategoryPage> {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| to_cell_value(cell).as_raw_string())
            .collect(),
        None => Vec::new(),
    };

    let index = ColumnIndex::from_headers(&headers, columns);
    let data_rows = range.height().saturating_sub(1);
    if !verify_structure(sheet_name, &headers, &index, columns, data_rows) {
        return None;
    }

    // シート上の行番号（1始まり）。範囲がA1から始まらない場合も実際の行番号に合わせる
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0) + 1;

    let raw_rows = rows
        .enumerate()
        .map(|(idx, row)| {
            let cells: Vec<CellValue> = row.iter().map(to_cell_value).collect();
            index.build_row(first_row + idx + 1, &cells)
        })
        .collect();

    Some(CategoryPage::new(sheet_name, raw_rows))
}
