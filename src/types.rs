//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    Text(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #VALUE!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定（空白のみの文字列も空とみなす）
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 値を文字列として取得
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// スプレッドシートから読み込んだ1行分の生データ
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// シート上の行番号（1始まり、ヘッダー行を含む）
    pub position: usize,

    /// 商品名（`PRODUCTO`）。空または空白のみの場合、行は出力されない
    pub product_name: String,

    /// 税抜き価格（`PRECIO`）
    pub base_price: CellValue,

    /// 税率列
    pub tax_rate: CellValue,

    /// 税込み合計（`TOTAL`）。`#VALUE!` などの不正値を含むことがある
    pub total_price: CellValue,
}

impl RawRow {
    /// テストやCSV入力向けの簡易コンストラクタ
    pub fn new(
        position: usize,
        product_name: impl Into<String>,
        base_price: CellValue,
        total_price: CellValue,
    ) -> Self {
        Self {
            position,
            product_name: product_name.into(),
            base_price,
            tax_rate: CellValue::Empty,
            total_price,
        }
    }

    /// 商品名が空白のみでないか
    pub fn has_name(&self) -> bool {
        !self.product_name.trim().is_empty()
    }
}

/// 1シート分のデータ。シート名がそのままカテゴリ名になる
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPage {
    /// シート名（カテゴリ名）
    pub name: String,

    /// シート上の順序を保った行
    pub rows: Vec<RawRow>,
}

impl CategoryPage {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// 価格の算出元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// `TOTAL / 税率係数`
    Total,
    /// `PRECIO` をそのまま使用
    Base,
    /// 既定の代替価格
    Fallback,
}

/// WooCommerceへインポートする1商品
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// 通し番号（1始まり）
    pub id: u32,
    pub product_type: String,
    /// 実行全体で一意なSKU
    pub sku: String,
    pub name: String,
    pub published: bool,
    pub featured: bool,
    pub visibility: String,
    pub short_description: String,
    pub description: String,
    pub tax_status: String,
    pub tax_class: String,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub low_stock_amount: u32,
    pub allow_backorders: bool,
    pub sold_individually: bool,
    pub reviews_allowed: bool,
    /// 税抜き価格（`Precio normal`）
    pub regular_price: f64,
    /// 価格の算出元
    pub price_source: PriceSource,
    /// カテゴリ名（シート名）
    pub category: String,
    /// タグ（カテゴリ名を小文字化し、空白を`-`に置換）
    pub tags: String,
    /// 画像の場所（URLまたはローカルパス）。未解決の場合は空
    pub images: String,
    /// 表示順
    pub position: u32,
}
