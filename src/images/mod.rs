//! Image Resolver Module
//!
//! 正規化済みレコードに商品画像の場所を割り当てるモジュール。
//! 商品名から作ったキーでキャッシュを引き、未登録の場合のみ画像の取得元を呼び出します。
//! 取得に失敗しても変換処理は中断せず、`Imágenes`列を空のままにします。

mod cache;
mod source;

pub use cache::{ImageCache, ImageCacheEntry, DEFAULT_CACHE_FILE};
pub use source::{DownloadSource, ImageSource, PlaceholderSource};

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::types::OutputRecord;

/// 商品名をキャッシュキーに正規化する（前後の空白除去、小文字化、連続空白の圧縮）
///
/// ```rust
/// use xlsxwoo::cache_key;
///
/// assert_eq!(cache_key("  Bits   DORITOS "), "bits doritos");
/// ```
pub fn cache_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 画像解決の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// キャッシュから解決した件数
    pub hits: usize,
    /// 取得元から新たに解決した件数
    pub fetched: usize,
    /// 取得に失敗した件数（同一キーの再試行はしない）
    pub failed: usize,
}

/// 画像リゾルバー
///
/// 1回の実行の中で、同じキーに対して取得元が2回呼ばれることはありません。
/// 失敗したキーも記録し、再試行しません。
pub struct ImageResolver<S: ImageSource> {
    source: S,
    cache: ImageCache,
    /// この件数の新規解決ごとにキャッシュを書き出す
    flush_every: usize,
    unflushed: usize,
    attempted: HashSet<String>,
    stats: ResolveStats,
}

impl<S: ImageSource> ImageResolver<S> {
    pub fn new(source: S, cache: ImageCache, flush_every: usize) -> Self {
        Self {
            source,
            cache,
            flush_every: flush_every.max(1),
            unflushed: 0,
            attempted: HashSet::new(),
            stats: ResolveStats::default(),
        }
    }

    /// すべてのレコードの画像を解決する
    pub fn resolve_all(&mut self, records: &mut [OutputRecord]) {
        for record in records.iter_mut() {
            if let Some(location) = self.resolve(record) {
                record.images = location;
            }
        }
    }

    /// 1件のレコードの画像の場所を返す。解決できない場合は `None`
    pub fn resolve(&mut self, record: &OutputRecord) -> Option<String> {
        let key = cache_key(&record.name);

        if let Some(entry) = self.cache.get(&key) {
            if self.source.accepts(&entry.location) {
                self.stats.hits += 1;
                return Some(entry.location.clone());
            }
            // 別の方式で解決された場所、または削除されたファイル
            debug!(
                product = %record.name,
                location = %entry.location,
                "cached image not usable by this source, resolving again"
            );
        }

        if !self.attempted.insert(key.clone()) {
            // 同じ実行内で既に失敗したキー
            return None;
        }

        match self.source.fetch(&key, record) {
            Ok(location) => {
                debug!(product = %record.name, %location, "resolved image");
                self.cache.insert(key, location.clone());
                self.stats.fetched += 1;
                self.unflushed += 1;
                if self.unflushed >= self.flush_every {
                    self.flush();
                }
                Some(location)
            }
            Err(e) => {
                warn!(
                    product = %record.name,
                    error = %e,
                    "image resolution failed, leaving field empty"
                );
                self.stats.failed += 1;
                None
            }
        }
    }

    /// 未書き出しの解決結果をキャッシュファイルへ書き出す
    ///
    /// 書き出しの失敗は警告として記録し、処理は継続します。
    pub fn flush(&mut self) {
        if self.unflushed == 0 {
            return;
        }
        match self.cache.persist() {
            Ok(()) => self.unflushed = 0,
            Err(e) => warn!(error = %e, "failed to persist image cache"),
        }
    }

    /// 書き出しを行い、集計を返す
    pub fn finish(mut self) -> ResolveStats {
        self.flush();
        self.stats
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }
}
