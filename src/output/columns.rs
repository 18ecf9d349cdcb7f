//! WooCommerce Columns
//!
//! WooCommerce（スペイン語版）の商品インポート形式の列定義。

use crate::types::OutputRecord;

/// 出力CSVの列（順序どおり）
pub const WOOCOMMERCE_COLUMNS: [&str; 41] = [
    "ID",
    "Tipo",
    "SKU",
    "GTIN",
    "Nombre",
    "Publicado",
    "¿Está destacado?",
    "Visibilidad en el catálogo",
    "Descripción corta",
    "Descripción",
    "Día en que empieza el precio rebajado",
    "Día en que termina el precio rebajado",
    "Estado del impuesto",
    "Clase de impuesto",
    "¿Existencias?",
    "Inventario",
    "Cantidad de bajo inventario",
    "¿Permitir reservas de productos agotados?",
    "¿Vendido individualmente?",
    "Peso (kg)",
    "Longitud (cm)",
    "Anchura (cm)",
    "Altura (cm)",
    "¿Permitir valoraciones de clientes?",
    "Nota de compra",
    "Precio rebajado",
    "Precio normal",
    "Categorías",
    "Etiquetas",
    "Clase de envío",
    "Imágenes",
    "Límite de descargas",
    "Días de caducidad de la descarga",
    "Superior",
    "Productos agrupados",
    "Ventas dirigidas",
    "Ventas cruzadas",
    "URL externa",
    "Texto del botón",
    "Posición",
    "Marcas",
];

fn flag(value: bool) -> String {
    let value = if value { "1" } else { "0" };
    value.to_string()
}

/// 価格を小数第2位まで出力する
pub(crate) fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// レコードを列順の値に変換する。対応する値のない列は空文字列
pub(crate) fn record_to_row(record: &OutputRecord) -> [String; 41] {
    let empty = String::new;
    [
        record.id.to_string(),
        record.product_type.clone(),
        record.sku.clone(),
        empty(),
        record.name.clone(),
        flag(record.published),
        flag(record.featured),
        record.visibility.clone(),
        record.short_description.clone(),
        record.description.clone(),
        empty(),
        empty(),
        record.tax_status.clone(),
        record.tax_class.clone(),
        flag(record.in_stock),
        record.stock_quantity.to_string(),
        record.low_stock_amount.to_string(),
        flag(record.allow_backorders),
        flag(record.sold_individually),
        empty(),
        empty(),
        empty(),
        empty(),
        flag(record.reviews_allowed),
        empty(),
        empty(),
        format_price(record.regular_price),
        record.category.clone(),
        record.tags.clone(),
        empty(),
        record.images.clone(),
        empty(),
        empty(),
        empty(),
        empty(),
        empty(),
        empty(),
        empty(),
        empty(),
        record.position.to_string(),
        empty(),
    ]
}
