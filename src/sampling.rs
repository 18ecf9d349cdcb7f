//! Sampling Module
//!
//! プレビュー（サンプル）モード用に、カテゴリ間で均等に行を選ぶ。

use crate::types::CategoryPage;

/// 件数上限付きのサンプルを選ぶ
///
/// 商品名のある行が1行以上あるカテゴリを対象に、各カテゴリの先頭から
/// `ceil(cap / カテゴリ数)` 行を選び、全体を `cap` 件に切り詰めます。
/// カテゴリの順序とカテゴリ内の行の順序は保たれます。乱数は使いません。
pub(crate) fn select_sample(pages: &[CategoryPage], cap: usize) -> Vec<CategoryPage> {
    let populated: Vec<&CategoryPage> = pages
        .iter()
        .filter(|page| page.rows.iter().any(|row| row.has_name()))
        .collect();

    if populated.is_empty() || cap == 0 {
        return Vec::new();
    }

    let per_category = cap.div_ceil(populated.len());
    let mut remaining = cap;
    let mut sample = Vec::with_capacity(populated.len());

    for page in populated {
        if remaining == 0 {
            break;
        }

        let take = per_category.min(remaining);
        let rows: Vec<_> = page
            .rows
            .iter()
            .filter(|row| row.has_name())
            .take(take)
            .cloned()
            .collect();

        remaining -= rows.len();
        sample.push(CategoryPage::new(page.name.clone(), rows));
    }

    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, RawRow};

    fn page(name: &str, n: usize) -> CategoryPage {
        let rows = (0..n)
            .map(|i| {
                RawRow::new(
                    i + 2,
                    format!("{} {}", name, i),
                    CellValue::Empty,
                    CellValue::Number(1.03),
                )
            })
            .collect();
        CategoryPage::new(name, rows)
    }

    fn total_rows(sample: &[CategoryPage]) -> usize {
        sample.iter().map(|p| p.rows.len()).sum()
    }

    #[test]
    fn test_even_distribution() {
        let pages = vec![page("A", 50), page("B", 50), page("C", 50)];
        let sample = select_sample(&pages, 100);

        // ceil(100 / 3) = 34 → 34 + 34 + 32
        let counts: Vec<usize> = sample.iter().map(|p| p.rows.len()).collect();
        assert_eq!(counts, vec![34, 34, 32]);
        assert_eq!(total_rows(&sample), 100);
    }

    #[test]
    fn test_small_categories_take_everything() {
        let pages = vec![page("A", 3), page("B", 2)];
        let sample = select_sample(&pages, 100);
        assert_eq!(total_rows(&sample), 5);
    }

    #[test]
    fn test_preserves_row_order() {
        let pages = vec![page("A", 10)];
        let sample = select_sample(&pages, 4);
        let names: Vec<&str> = sample[0]
            .rows
            .iter()
            .map(|r| r.product_name.as_str())
            .collect();
        assert_eq!(names, vec!["A 0", "A 1", "A 2", "A 3"]);
    }

    #[test]
    fn test_skips_unnamed_rows_and_empty_categories() {
        let mut a = page("A", 2);
        a.rows
            .insert(0, RawRow::new(1, "", CellValue::Empty, CellValue::Empty));
        let empty = CategoryPage::new("EMPTY", vec![]);
        let pages = vec![empty, a, page("B", 5)];

        let sample = select_sample(&pages, 4);
        let names: Vec<&str> = sample.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(sample[0].rows.len(), 2);
        assert!(sample[0].rows.iter().all(|r| r.has_name()));
        assert_eq!(sample[1].rows.len(), 2);
    }

    #[test]
    fn test_no_input() {
        assert!(select_sample(&[], 100).is_empty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bounded_and_deterministic(
                sizes in proptest::collection::vec(0usize..60, 1..8),
                cap in 1usize..150,
            ) {
                let pages: Vec<CategoryPage> = sizes
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| page(&format!("CAT{}", i), n))
                    .collect();

                let first = select_sample(&pages, cap);
                let second = select_sample(&pages, cap);

                prop_assert!(total_rows(&first) <= cap);
                prop_assert_eq!(first, second);
            }
        }
    }
}
