//! Conversion Summary
//!
//! 変換結果の集計（カテゴリ別件数、価格の統計など）。

use tracing::info;

use crate::images::ResolveStats;
use crate::types::{OutputRecord, PriceSource};

/// 価格の統計
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// 変換結果の集計
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    /// 出力した商品数
    pub total: usize,
    /// カテゴリごとの商品数（入力順）
    pub per_category: Vec<(String, usize)>,
    /// 価格の統計（商品がない場合は `None`）
    pub prices: Option<PriceStats>,
    /// 代替価格を割り当てた商品数
    pub fallback_prices: usize,
    /// 画像の場所を持つ商品数
    pub with_images: usize,
    /// 画像解決の集計（画像解決が無効の場合は `None`）
    pub images: Option<ResolveStats>,
}

impl ConversionSummary {
    pub fn from_records(records: &[OutputRecord], images: Option<ResolveStats>) -> Self {
        let mut per_category: Vec<(String, usize)> = Vec::new();
        for record in records {
            match per_category.iter_mut().find(|(name, _)| *name == record.category) {
                Some((_, count)) => *count += 1,
                None => per_category.push((record.category.clone(), 1)),
            }
        }

        let prices = if records.is_empty() {
            None
        } else {
            let (sum, min, max) = records.iter().map(|r| r.regular_price).fold(
                (0.0, f64::INFINITY, f64::NEG_INFINITY),
                |(sum, min, max), p| (sum + p, min.min(p), max.max(p)),
            );
            Some(PriceStats {
                mean: sum / records.len() as f64,
                min,
                max,
            })
        };

        Self {
            total: records.len(),
            per_category,
            prices,
            fallback_prices: records
                .iter()
                .filter(|r| r.price_source == PriceSource::Fallback)
                .count(),
            with_images: records.iter().filter(|r| !r.images.is_empty()).count(),
            images,
        }
    }

    /// 集計をログに出力する
    pub fn log(&self) {
        info!(products = self.total, "conversion summary");
        for (category, count) in &self.per_category {
            info!(%category, products = count, "category");
        }
        if let Some(prices) = self.prices {
            info!(
                mean = %format!("{:.2}", prices.mean),
                min = %format!("{:.2}", prices.min),
                max = %format!("{:.2}", prices.max),
                fallback = self.fallback_prices,
                "prices"
            );
        }
        if let Some(images) = self.images {
            info!(
                with_images = self.with_images,
                cache_hits = images.hits,
                fetched = images.fetched,
                failed = images.failed,
                "images"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::CatalogDefaults;
    use crate::normalizer::RowNormalizer;
    use crate::types::{CategoryPage, CellValue, RawRow};

    fn records() -> Vec<OutputRecord> {
        let defaults = CatalogDefaults::default();
        let pages = vec![
            CategoryPage::new(
                "PAPAS",
                vec![
                    RawRow::new(2, "A", CellValue::Empty, CellValue::Number(1.03)),
                    RawRow::new(3, "B", CellValue::Number(3.0), "#VALUE!".into()),
                ],
            ),
            CategoryPage::new(
                "DULCES",
                vec![RawRow::new(2, "C", CellValue::Empty, "#VALUE!".into())],
            ),
        ];
        RowNormalizer::new(&defaults).normalize_pages(&pages)
    }

    #[test]
    fn test_summary_counts() {
        let mut recs = records();
        recs[0].images = "a.png".to_string();
        let summary = ConversionSummary::from_records(&recs, None);

        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.per_category,
            vec![("PAPAS".to_string(), 2), ("DULCES".to_string(), 1)]
        );
        assert_eq!(summary.fallback_prices, 1);
        assert_eq!(summary.with_images, 1);

        let prices = summary.prices.unwrap();
        assert_eq!(prices.min, 0.0);
        assert_eq!(prices.max, 3.0);
        assert!((prices.mean - 4.0 / 3.0).abs() < 1e-9);
        summary.log();
    }

    #[test]
    fn test_summary_empty() {
        let summary = ConversionSummary::from_records(&[], None);
        assert_eq!(summary.total, 0);
        assert!(summary.prices.is_none());
        assert!(summary.per_category.is_empty());
    }
}
