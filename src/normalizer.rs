//! Row Normalizer Module
//!
//! スプレッドシートの行をWooCommerceの出力レコードへ変換するモジュール。
//! 価格の算出、SKUの採番、固定値の適用を担当します。
//!
//! 不正なセル値によって処理が中断されることはありません。すべての行は
//! 代替価格付きのレコードになるか、商品名が空のためスキップされます。

use tracing::debug;

use crate::defaults::CatalogDefaults;
use crate::types::{CategoryPage, CellValue, OutputRecord, PriceSource, RawRow};

/// 金額セルの解釈結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Amount {
    /// 数値として解釈できた
    Value(f64),
    /// 空セル
    Missing,
    /// エラー値・数値でない文字列など
    Malformed,
}

impl Amount {
    /// 正の数値の場合のみ値を返す
    fn positive(self) -> Option<f64> {
        match self {
            Amount::Value(v) if v > 0.0 => Some(v),
            _ => None,
        }
    }
}

/// 金額セルを解釈する
///
/// 文字列は `€` と空白を取り除き、小数点の `,` を `.` に置き換えてから解析します。
pub(crate) fn parse_amount(cell: &CellValue) -> Amount {
    if cell.is_empty() {
        return Amount::Missing;
    }

    match cell {
        CellValue::Number(n) if n.is_finite() => Amount::Value(*n),
        CellValue::Number(_) => Amount::Malformed,
        CellValue::Empty => Amount::Missing,
        CellValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != '€' && !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            if cleaned.is_empty() {
                return Amount::Missing;
            }
            match cleaned.parse::<f64>() {
                Ok(v) if v.is_finite() => Amount::Value(v),
                _ => Amount::Malformed,
            }
        }
        CellValue::Bool(_) | CellValue::Error(_) => Amount::Malformed,
    }
}

/// 小数第2位で四捨五入する
pub(crate) fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `TOTAL`・`PRECIO` から税抜き価格を求める
///
/// 1. `TOTAL` が正の数値 → `round(TOTAL / tax_factor, 2)`
/// 2. それ以外で `PRECIO` が正の数値 → `PRECIO`
/// 3. どちらも使えない → `fallback_price`
pub(crate) fn derive_price(row: &RawRow, defaults: &CatalogDefaults) -> (f64, PriceSource) {
    if let Some(total) = parse_amount(&row.total_price).positive() {
        return (round_currency(total / defaults.tax_factor), PriceSource::Total);
    }

    if let Some(base) = parse_amount(&row.base_price).positive() {
        return (base, PriceSource::Base);
    }

    (defaults.fallback_price, PriceSource::Fallback)
}

/// カテゴリ名からSKUの接頭辞を作る（英数字の先頭3文字、大文字）
pub(crate) fn category_code(category: &str) -> String {
    let code: String = category
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .flat_map(char::to_uppercase)
        .collect();
    if code.is_empty() {
        "GEN".to_string()
    } else {
        code
    }
}

/// カテゴリと通し番号からSKUを生成する
///
/// 通し番号は実行全体で一意なため、SKUも一意になります。
pub(crate) fn make_sku(category: &str, ordinal: u32) -> String {
    format!("{}-{:04}", category_code(category), ordinal)
}

/// カテゴリ名からタグを作る（小文字化、空白を`-`に置換）
fn make_tags(category: &str) -> String {
    category.to_lowercase().replace(' ', "-")
}

/// 行正規化器
///
/// 固定値テーブルを参照しながら、行を出力レコードへ変換します。
#[derive(Debug, Clone)]
pub struct RowNormalizer<'a> {
    defaults: &'a CatalogDefaults,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(defaults: &'a CatalogDefaults) -> Self {
        Self { defaults }
    }

    /// すべてのページを正規化する
    ///
    /// カテゴリは入力順、カテゴリ内の行はシート上の順序を保ちます。
    /// IDとSKUの通し番号は出力されたレコードに対して1から振られます。
    pub fn normalize_pages(&self, pages: &[CategoryPage]) -> Vec<OutputRecord> {
        let mut records = Vec::new();
        let mut next_ordinal: u32 = 1;

        for page in pages {
            for row in &page.rows {
                if let Some(record) = self.normalize_row(&page.name, row, next_ordinal) {
                    records.push(record);
                    next_ordinal += 1;
                }
            }
        }

        records
    }

    /// 1行を正規化する。商品名が空の場合は `None`
    pub fn normalize_row(
        &self,
        category: &str,
        row: &RawRow,
        ordinal: u32,
    ) -> Option<OutputRecord> {
        if !row.has_name() {
            debug!(category, row = row.position, "skipping row without product name");
            return None;
        }

        let name = row.product_name.trim().to_string();
        let (regular_price, price_source) = derive_price(row, self.defaults);

        if price_source == PriceSource::Fallback {
            debug!(
                category,
                row = row.position,
                product = %name,
                total = %row.total_price.as_raw_string(),
                "no usable price, applying fallback"
            );
        }

        let defaults = self.defaults;
        Some(OutputRecord {
            id: ordinal,
            product_type: defaults.product_type.clone(),
            sku: make_sku(category, ordinal),
            short_description: format!("Producto de la categoría {}", category),
            description: format!("Producto {} de la categoría {}", name, category),
            name,
            published: defaults.published,
            featured: defaults.featured,
            visibility: defaults.visibility.clone(),
            tax_status: defaults.tax_status.clone(),
            tax_class: defaults.tax_class.clone(),
            in_stock: defaults.in_stock,
            stock_quantity: defaults.stock_quantity,
            low_stock_amount: defaults.low_stock_amount,
            allow_backorders: defaults.allow_backorders,
            sold_individually: defaults.sold_individually,
            reviews_allowed: defaults.reviews_allowed,
            regular_price,
            price_source,
            category: category.to_string(),
            tags: make_tags(category),
            images: String::new(),
            position: ordinal,
        })
    }
}
