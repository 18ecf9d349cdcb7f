//! Catalog Defaults Module
//!
//! 出力レコードの固定値（在庫数、税区分、公開フラグなど）と、入力列名を
//! 1か所にまとめた設定テーブル。

use serde::Deserialize;

use crate::error::CatalogError;

/// WooCommerce出力の固定値テーブル
///
/// すべてのレコードに共通する値はここから取得します。`ConverterBuilder::with_defaults()`
/// または JSON（[`CatalogDefaults::from_json_str`]）で上書きできます。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogDefaults {
    /// 商品タイプ（`Tipo`列）
    pub product_type: String,
    /// 公開済みか（`Publicado`）
    pub published: bool,
    /// おすすめ商品か（`¿Está destacado?`）
    pub featured: bool,
    /// カタログでの表示（`Visibilidad en el catálogo`）
    pub visibility: String,
    /// 税の状態（`Estado del impuesto`）
    pub tax_status: String,
    /// 税区分（`Clase de impuesto`）
    pub tax_class: String,
    /// 在庫あり（`¿Existencias?`）
    pub in_stock: bool,
    /// 在庫数（`Inventario`）
    pub stock_quantity: u32,
    /// 在庫僅少のしきい値（`Cantidad de bajo inventario`）
    pub low_stock_amount: u32,
    /// 在庫切れ時の予約を許可するか
    pub allow_backorders: bool,
    /// 個別販売のみか
    pub sold_individually: bool,
    /// レビューを許可するか
    pub reviews_allowed: bool,
    /// `TOTAL`・`PRECIO`とも使えない行に割り当てる価格
    pub fallback_price: f64,
    /// 税込み価格から税抜き価格を求める係数（`TOTAL / tax_factor`）
    pub tax_factor: f64,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        Self {
            product_type: "simple".to_string(),
            published: true,
            featured: false,
            visibility: "visible".to_string(),
            tax_status: "taxable".to_string(),
            tax_class: "standard".to_string(),
            in_stock: true,
            stock_quantity: 100,
            low_stock_amount: 5,
            allow_backorders: false,
            sold_individually: false,
            reviews_allowed: true,
            fallback_price: 0.0,
            tax_factor: 1.03,
        }
    }
}

impl CatalogDefaults {
    /// JSON文字列から読み込む。省略されたキーは既定値になる
    ///
    /// ```rust
    /// use xlsxwoo::CatalogDefaults;
    ///
    /// let defaults = CatalogDefaults::from_json_str(r#"{ "stock_quantity": 20 }"#).unwrap();
    /// assert_eq!(defaults.stock_quantity, 20);
    /// assert_eq!(defaults.low_stock_amount, 5);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let defaults: Self = serde_json::from_str(json)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// 値の整合性を検証する
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        if !self.tax_factor.is_finite() || self.tax_factor <= 0.0 {
            return Err(CatalogError::Config(format!(
                "Invalid tax factor: {} (must be > 0)",
                self.tax_factor
            )));
        }

        if !self.fallback_price.is_finite() || self.fallback_price < 0.0 {
            return Err(CatalogError::Config(format!(
                "Invalid fallback price: {} (must be >= 0)",
                self.fallback_price
            )));
        }

        Ok(())
    }
}

/// 入力シートの列名
///
/// ヘッダー行との照合は前後の空白を除き、大文字小文字を区別しません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    /// 商品名（必須）
    pub product: String,
    /// 税抜き価格（任意）
    pub base_price: String,
    /// 税率列（任意）
    pub tax_rate: String,
    /// 税込み合計（必須）
    pub total: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            product: "PRODUCTO".to_string(),
            base_price: "PRECIO".to_string(),
            tax_rate: "0,3".to_string(),
            total: "TOTAL".to_string(),
        }
    }
}

impl ColumnNames {
    /// 検証時に存在を確認する列名のリスト
    pub fn expected(&self) -> [&str; 4] {
        [&self.product, &self.base_price, &self.tax_rate, &self.total]
    }
}
