// 上游数据源的 TTL 缓存
// 每个数据源独立缓存：未过期直接返回；过期后重新拉取，拉取失败时继续返回旧数据

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join3;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::client::{HttpFetcher, UpstreamFetcher};
use super::source::SourceKind;
use super::transform::{self, NormalizedCardData};
use crate::config::Config;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct UpstreamOptions {
    pub base_url: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl UpstreamOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.upstream_base_url.clone(),
            cache_ttl: config.cache_ttl(),
            request_timeout: config.upstream_timeout(),
        }
    }
}

impl Default for UpstreamOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// 一次成功拉取的原始数据
struct CacheEntry {
    payload: Arc<Value>,
    fetched_at: Instant,
}

/// 所有数据源的标准化数据，各自独立获取
#[derive(Debug, Clone, Serialize)]
pub struct AllSourceData {
    pub transit: NormalizedCardData,
    pub events: NormalizedCardData,
    pub tasks: NormalizedCardData,
}

impl AllSourceData {
    pub fn for_kind(&self, kind: SourceKind) -> &NormalizedCardData {
        match kind {
            SourceKind::Transit => &self.transit,
            SourceKind::Events => &self.events,
            SourceKind::Tasks => &self.tasks,
        }
    }
}

pub struct UpstreamCache {
    fetcher: Arc<dyn UpstreamFetcher>,
    ttl: Duration,
    entries: RwLock<HashMap<SourceKind, CacheEntry>>,
}

impl UpstreamCache {
    pub fn new(fetcher: Arc<dyn UpstreamFetcher>, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 使用 HTTP 拉取器创建缓存
    pub fn from_options(options: &UpstreamOptions) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(options.base_url.clone(), options.request_timeout)?;
        Ok(Self::new(Arc::new(fetcher), options.cache_ttl))
    }

    /// 获取 `kind` 的原始数据：优先未过期缓存，其次重新拉取，失败时返回旧数据
    /// 从未成功拉取过则返回 `None`
    pub async fn fetch(&self, kind: SourceKind) -> Option<Arc<Value>> {
        if let Some(payload) = self.fresh(kind).await {
            tracing::debug!("cache hit for {}", kind);
            return Some(payload);
        }

        match self.fetcher.fetch(kind).await {
            Ok(payload) => {
                let payload = Arc::new(payload);
                self.entries.write().await.insert(
                    kind,
                    CacheEntry {
                        payload: Arc::clone(&payload),
                        fetched_at: Instant::now(),
                    },
                );
                tracing::debug!("refreshed {} from upstream", kind);
                Some(payload)
            }
            Err(e) => {
                let stale = self
                    .entries
                    .read()
                    .await
                    .get(&kind)
                    .map(|entry| Arc::clone(&entry.payload));
                match stale {
                    Some(_) => tracing::warn!("fetching {} failed, serving stale data: {}", kind, e),
                    None => tracing::warn!("fetching {} failed with nothing cached: {}", kind, e),
                }
                stale
            }
        }
    }

    async fn fresh(&self, kind: SourceKind) -> Option<Arc<Value>> {
        let entries = self.entries.read().await;
        entries
            .get(&kind)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// `kind` 的标准化卡片数据，不可用时返回占位数据
    pub async fn get(&self, kind: SourceKind) -> NormalizedCardData {
        let payload = self.fetch(kind).await;
        transform::normalize(kind, payload.as_deref(), Utc::now())
    }

    /// 并发获取所有数据源，单个失败不影响其他数据源
    pub async fn get_all(&self) -> AllSourceData {
        let (transit, events, tasks) = join3(
            self.get(SourceKind::Transit),
            self.get(SourceKind::Events),
            self.get(SourceKind::Tasks),
        )
        .await;

        AllSourceData {
            transit,
            events,
            tasks,
        }
    }

    /// 清空缓存，下次读取重新拉取
    pub async fn invalidate(&self) {
        self.entries.write().await.clear();
        tracing::info!("upstream cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::client::FetchError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按数据源返回固定数据并计数，可指定失败的数据源
    struct FakeFetcher {
        payloads: Mutex<HashMap<SourceKind, Value>>,
        failing: Mutex<Vec<SourceKind>>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn new() -> Self {
            let payloads = HashMap::from([
                (
                    SourceKind::Transit,
                    json!([{"route": "Red Line", "destination": "Howard", "arrival_time": "2:15 PM", "minutes_away": 5}]),
                ),
                (
                    SourceKind::Events,
                    json!([{"title": "Standup", "start_time": "9:00 AM", "description": "Daily"}]),
                ),
                (
                    SourceKind::Tasks,
                    json!({"tasks": [{"text": "A", "completed": false}, {"text": "B", "completed": true}]}),
                ),
            ]);
            Self {
                payloads: Mutex::new(payloads),
                failing: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn fail(&self, kind: SourceKind) {
            self.failing.lock().unwrap().push(kind);
        }

        fn set_payload(&self, kind: SourceKind, payload: Value) {
            self.payloads.lock().unwrap().insert(kind, payload);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UpstreamFetcher for FakeFetcher {
        async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.lock().unwrap().contains(&kind) {
                return Err(FetchError::Status {
                    url: kind.path().to_string(),
                    status: 503,
                });
            }
            Ok(self.payloads.lock().unwrap()[&kind].clone())
        }
    }

    fn cache_with(ttl: Duration) -> (UpstreamCache, Arc<FakeFetcher>) {
        let fetcher = Arc::new(FakeFetcher::new());
        let cache = UpstreamCache::new(fetcher.clone(), ttl);
        (cache, fetcher)
    }

    #[tokio::test]
    async fn second_read_within_ttl_does_not_refetch() {
        let (cache, fetcher) = cache_with(DEFAULT_CACHE_TTL);

        let first = cache.fetch(SourceKind::Transit).await.unwrap();
        let second = cache.fetch(SourceKind::Transit).await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched_and_replaced() {
        let (cache, fetcher) = cache_with(Duration::ZERO);

        cache.fetch(SourceKind::Events).await.unwrap();
        fetcher.set_payload(SourceKind::Events, json!([{"title": "Retro"}]));
        let refreshed = cache.fetch(SourceKind::Events).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(*refreshed, json!([{"title": "Retro"}]));
    }

    #[tokio::test]
    async fn failure_after_success_serves_stale_payload() {
        let (cache, fetcher) = cache_with(Duration::ZERO);

        let original = cache.fetch(SourceKind::Tasks).await.unwrap();
        fetcher.fail(SourceKind::Tasks);
        let fallback = cache.fetch(SourceKind::Tasks).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(original, fallback);
    }

    #[tokio::test]
    async fn failure_without_cache_yields_placeholder() {
        let (cache, fetcher) = cache_with(DEFAULT_CACHE_TTL);
        fetcher.fail(SourceKind::Transit);

        assert!(cache.fetch(SourceKind::Transit).await.is_none());
        let card = cache.get(SourceKind::Transit).await;

        assert!(card.items.is_empty());
        assert!(card.last_updated.is_none());
        assert_eq!(card.content.as_deref(), Some("Transit data unavailable"));
    }

    #[tokio::test]
    async fn get_all_isolates_a_failing_source() {
        let (cache, fetcher) = cache_with(DEFAULT_CACHE_TTL);
        fetcher.fail(SourceKind::Events);

        let all = cache.get_all().await;

        assert_eq!(all.transit.items.len(), 1);
        assert_eq!(all.tasks.subtitle.as_deref(), Some("1/2 completed"));
        assert!(all.events.items.is_empty());
        assert_eq!(all.events.content.as_deref(), Some("Events data unavailable"));
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_fetch() {
        let (cache, fetcher) = cache_with(DEFAULT_CACHE_TTL);

        cache.get_all().await;
        cache.get_all().await;
        assert_eq!(fetcher.calls(), 3);

        cache.invalidate().await;
        cache.get_all().await;
        assert_eq!(fetcher.calls(), 6);
    }

    #[tokio::test]
    async fn invalidate_drops_the_stale_fallback() {
        let (cache, fetcher) = cache_with(DEFAULT_CACHE_TTL);

        cache.fetch(SourceKind::Transit).await.unwrap();
        cache.invalidate().await;
        fetcher.fail(SourceKind::Transit);

        assert!(cache.fetch(SourceKind::Transit).await.is_none());
    }

    #[tokio::test]
    async fn last_updated_is_stamped_on_every_read() {
        let (cache, fetcher) = cache_with(DEFAULT_CACHE_TTL);

        let first = cache.get(SourceKind::Transit).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = cache.get(SourceKind::Transit).await;

        assert_eq!(fetcher.calls(), 1);
        assert!(second.last_updated > first.last_updated);
        assert_eq!(first.items, second.items);
    }

    /// 每次拉取都耗时 300ms，Events 始终失败
    struct SlowFetcher {
        inner: FakeFetcher,
    }

    #[async_trait]
    impl UpstreamFetcher for SlowFetcher {
        async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError> {
            tokio::time::sleep(Duration::from_millis(300)).await;
            self.inner.fetch(kind).await
        }
    }

    #[tokio::test]
    async fn get_all_fetches_sources_concurrently() {
        let inner = FakeFetcher::new();
        inner.fail(SourceKind::Events);
        let fetcher = Arc::new(SlowFetcher { inner });
        let cache = UpstreamCache::new(fetcher.clone(), DEFAULT_CACHE_TTL);

        let started = Instant::now();
        let all = cache.get_all().await;
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_millis(700), "took {elapsed:?}");
        assert_eq!(fetcher.inner.calls(), 3);
        assert_eq!(all.transit.items.len(), 1);
        assert_eq!(all.tasks.subtitle.as_deref(), Some("1/2 completed"));
        assert_eq!(all.events.content.as_deref(), Some("Events data unavailable"));
    }
}
