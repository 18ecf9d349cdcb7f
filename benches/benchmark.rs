//! パフォーマンスベンチマーク
//!
//! 正規化とCSV出力の処理速度を測定する。入力は合成したページを使うため、
//! フィクスチャファイルは不要です。
//!
//! ワークブックの読み込み速度は calamine に依存するため、ここでは測定しません。

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlsxwoo::{write_records, CategoryPage, CellValue, ConverterBuilder, RawRow, RunMode};

/// `categories` カテゴリ × `rows` 行のページを生成する
///
/// 10行に1行は `#VALUE!`、20行に1行は商品名が空。
fn synthetic_pages(categories: usize, rows: usize) -> Vec<CategoryPage> {
    (0..categories)
        .map(|c| {
            let rows = (0..rows)
                .map(|r| {
                    let name = if r % 20 == 19 {
                        String::new()
                    } else {
                        format!("PRODUCTO {} {}", c, r)
                    };
                    let total = if r % 10 == 9 {
                        CellValue::Error("#VALUE!".to_string())
                    } else {
                        CellValue::Number(1.03 * (r + 1) as f64)
                    };
                    RawRow::new(r + 2, name, CellValue::Number((r + 1) as f64), total)
                })
                .collect();
            CategoryPage::new(format!("CATEGORIA {}", c), rows)
        })
        .collect()
}

fn benchmark_normalize(c: &mut Criterion) {
    let converter = ConverterBuilder::new().build().unwrap();
    let mut group = c.benchmark_group("normalize");

    for &(categories, rows) in &[(5, 100), (20, 500), (50, 2_000)] {
        let pages = synthetic_pages(categories, rows);
        group.throughput(Throughput::Elements((categories * rows) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", categories, rows)),
            &pages,
            |b, pages| b.iter(|| black_box(converter.normalize(black_box(pages)))),
        );
    }

    group.finish();
}

fn benchmark_sample(c: &mut Criterion) {
    let converter = ConverterBuilder::new()
        .with_run_mode(RunMode::Sample { cap: 100 })
        .build()
        .unwrap();
    let pages = synthetic_pages(50, 2_000);

    c.bench_function("sample_100_of_100k", |b| {
        b.iter(|| black_box(converter.normalize(black_box(&pages))))
    });
}

fn benchmark_write_csv(c: &mut Criterion) {
    let converter = ConverterBuilder::new().build().unwrap();
    let records = converter.normalize(&synthetic_pages(20, 500));

    let mut group = c.benchmark_group("write_csv");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("10k_records", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(4 * 1024 * 1024);
            write_records(black_box(&records), &mut buffer).unwrap();
            black_box(buffer)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_normalize,
    benchmark_sample,
    benchmark_write_csv
);
criterion_main!(benches);
