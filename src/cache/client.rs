//! Cached wrapper for the ForgeML API client
//!
//! Applies the per-endpoint caching policy: read endpoints are cached with
//! endpoint-specific TTLs, live-state and binary endpoints pass through, and
//! writes invalidate the read entries they affect.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::{CacheStats, CacheTag, CacheTtl, TtlCache, cache_key};
use crate::client::api::{DatasetApi, ProjectApi, TrainingApi};
use crate::client::models::{
    DatasetAnalysis, DatasetUpload, ProjectListItem, ProjectResponse, StartTrainingResponse,
    SummaryStatus, TrainingConfigOptions, TrainingLogs, TrainingRequest, TrainingResponse,
    TrainingSummary, UploadResponse,
};
use crate::client::ForgeApi;
use crate::error::Result;

const OP_LIST_PROJECTS: &str = "list_projects";
const OP_PROJECT_STATUS: &str = "get_project_status";
const OP_DATASET_ANALYSIS: &str = "get_dataset_analysis";
const OP_TRAINING_SUMMARY: &str = "get_training_summary";
const OP_CONFIG_OPTIONS: &str = "get_training_config_options";

/// Cached wrapper for any ForgeApi implementation.
///
/// Responses are stored as serialized JSON so a cached value is returned
/// byte-for-byte as it was stored. Cache can be disabled via the `enabled`
/// flag (for `--no-cache`). The cache is wrapped in a Mutex so a single
/// client can be shared by concurrent pollers.
pub struct CachedForgeClient<C: ForgeApi> {
    inner: Arc<C>,
    cache: Option<Mutex<TtlCache<Vec<u8>>>>,
}

impl<C: ForgeApi> CachedForgeClient<C> {
    /// Create a new cached client wrapper.
    ///
    /// # Arguments
    /// * `inner` - The underlying API client to wrap
    /// * `enabled` - Whether caching is enabled (false for --no-cache)
    pub fn new(inner: C, enabled: bool) -> Self {
        let cache = if enabled {
            Some(Mutex::new(TtlCache::new()))
        } else {
            None
        };
        Self {
            inner: Arc::new(inner),
            cache,
        }
    }

    /// Get the inner client
    #[allow(dead_code)]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Cache statistics, or `None` when caching is disabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        let cache = self.cache.as_ref()?;
        let guard = cache.lock().ok()?;
        Some(guard.stats())
    }

    /// Drop every cached response
    #[allow(dead_code)]
    pub fn clear_cache(&self) -> usize {
        self.with_cache(|cache| cache.clear())
    }

    /// Drop every cached response scoped to one project
    pub fn invalidate_project(&self, project_id: &str) -> usize {
        self.invalidate_tag(&CacheTag::project(project_id))
    }

    /// Drop every cached response whose key contains `pattern`
    #[allow(dead_code)]
    pub fn invalidate_matching(&self, pattern: &str) -> usize {
        let removed = self.with_cache(|cache| cache.invalidate(pattern));
        log::debug!("Cache invalidate '{}': {} entries", pattern, removed);
        removed
    }

    fn invalidate_tag(&self, tag: &CacheTag) -> usize {
        let removed = self.with_cache(|cache| cache.invalidate_tag(tag));
        log::debug!("Cache invalidate {}: {} entries", tag, removed);
        removed
    }

    fn with_cache(&self, f: impl FnOnce(&mut TtlCache<Vec<u8>>) -> usize) -> usize {
        match self.cache.as_ref().map(|cache| cache.lock()) {
            Some(Ok(mut guard)) => f(&mut guard),
            _ => 0,
        }
    }

    /// Try to get cached data
    fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cache = self.cache.as_ref()?;
        let mut guard = cache.lock().ok()?;
        guard
            .get(key)
            .and_then(|data| serde_json::from_slice(&data).ok())
    }

    /// Invalidation generation of `tags`, taken before a fetch starts
    fn generation(&self, tags: &[CacheTag]) -> u64 {
        match self.cache.as_ref().map(|cache| cache.lock()) {
            Some(Ok(guard)) => guard.generation(tags),
            _ => 0,
        }
    }

    /// Store data in cache unless `tags` were invalidated since `seen`
    fn set_cached<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        ttl: Duration,
        tags: Vec<CacheTag>,
        seen: u64,
    ) {
        if let Some(ref cache) = self.cache
            && let Ok(mut guard) = cache.lock()
            && let Ok(json) = serde_json::to_vec(data)
            && !guard.set_if_current(key, json, ttl, tags, seen)
        {
            log::debug!("Cache skip: {} was invalidated while fetching", key);
        }
    }

    /// Cache-first fetch with a fixed TTL
    async fn fetch_cached<T, F, Fut>(
        &self,
        operation: &'static str,
        args: &[&str],
        project_id: Option<&str>,
        ttl: Duration,
        fetch: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let key = cache_key(operation, args);

        if let Some(cached) = self.get_cached(&key) {
            log::debug!("Cache hit: {}", operation);
            return Ok(cached);
        }

        let tags = tags_for(operation, project_id);
        let seen = self.generation(&tags);
        let result = fetch().await?;
        self.set_cached(&key, &result, ttl, tags, seen);
        Ok(result)
    }
}

fn tags_for(operation: &'static str, project_id: Option<&str>) -> Vec<CacheTag> {
    let mut tags = vec![CacheTag::Operation(operation)];
    if let Some(id) = project_id {
        tags.push(CacheTag::project(id));
    }
    tags
}

/// Summary TTL depends on whether the AI summary is final
fn summary_ttl(summary: &TrainingSummary) -> Option<Duration> {
    match summary.ai_summary_status {
        SummaryStatus::Completed => Some(CacheTtl::SUMMARY_COMPLETED),
        SummaryStatus::Generating => Some(CacheTtl::SUMMARY_GENERATING),
        _ => None,
    }
}

#[async_trait]
impl<C: ForgeApi + 'static> ProjectApi for CachedForgeClient<C> {
    /// Create - never cached; listings are stale afterwards
    async fn create_project(&self, name: &str, prompt: &str) -> Result<ProjectResponse> {
        let result = self.inner.create_project(name, prompt).await?;
        self.invalidate_tag(&CacheTag::Operation(OP_LIST_PROJECTS));
        Ok(result)
    }

    async fn get_project_status(&self, project_id: &str) -> Result<ProjectResponse> {
        self.fetch_cached(
            OP_PROJECT_STATUS,
            &[project_id],
            Some(project_id),
            CacheTtl::PROJECT_STATUS,
            || self.inner.get_project_status(project_id),
        )
        .await
    }

    async fn get_project_status_fresh(&self, project_id: &str) -> Result<ProjectResponse> {
        let tags = tags_for(OP_PROJECT_STATUS, Some(project_id));
        let seen = self.generation(&tags);
        let result = self.inner.get_project_status(project_id).await?;
        self.set_cached(
            &cache_key(OP_PROJECT_STATUS, &[project_id]),
            &result,
            CacheTtl::PROJECT_STATUS,
            tags,
            seen,
        );
        Ok(result)
    }

    async fn list_projects(&self, limit: usize, offset: usize) -> Result<Vec<ProjectListItem>> {
        let limit_arg = limit.to_string();
        let offset_arg = offset.to_string();
        self.fetch_cached(
            OP_LIST_PROJECTS,
            &[limit_arg.as_str(), offset_arg.as_str()],
            None,
            CacheTtl::PROJECT_LIST,
            || self.inner.list_projects(limit, offset),
        )
        .await
    }

    /// Delete - never cached; drops everything about the project and listings
    async fn delete_project(&self, project_id: &str) -> Result<ProjectResponse> {
        let result = self.inner.delete_project(project_id).await?;
        self.invalidate_project(project_id);
        self.invalidate_tag(&CacheTag::Operation(OP_LIST_PROJECTS));
        Ok(result)
    }

    /// Binary download - never cached
    async fn download_project_code(&self, project_id: &str) -> Result<Vec<u8>> {
        self.inner.download_project_code(project_id).await
    }
}

#[async_trait]
impl<C: ForgeApi + 'static> DatasetApi for CachedForgeClient<C> {
    /// Upload - never cached; drops everything about the project
    async fn upload_dataset(
        &self,
        project_id: &str,
        upload: DatasetUpload,
    ) -> Result<UploadResponse> {
        let result = self.inner.upload_dataset(project_id, upload).await?;
        self.invalidate_project(project_id);
        Ok(result)
    }

    async fn get_dataset_analysis(&self, project_id: &str) -> Result<DatasetAnalysis> {
        self.fetch_cached(
            OP_DATASET_ANALYSIS,
            &[project_id],
            Some(project_id),
            CacheTtl::DEFAULT,
            || self.inner.get_dataset_analysis(project_id),
        )
        .await
    }

    async fn get_dataset_analysis_fresh(&self, project_id: &str) -> Result<DatasetAnalysis> {
        let tags = tags_for(OP_DATASET_ANALYSIS, Some(project_id));
        let seen = self.generation(&tags);
        let result = self.inner.get_dataset_analysis(project_id).await?;
        self.set_cached(
            &cache_key(OP_DATASET_ANALYSIS, &[project_id]),
            &result,
            CacheTtl::DEFAULT,
            tags,
            seen,
        );
        Ok(result)
    }
}

#[async_trait]
impl<C: ForgeApi + 'static> TrainingApi for CachedForgeClient<C> {
    /// Start - never cached; drops everything about the project
    async fn start_training(&self, request: TrainingRequest) -> Result<StartTrainingResponse> {
        let project_id = request.project_id.clone();
        let result = self.inner.start_training(request).await?;
        self.invalidate_project(&project_id);
        Ok(result)
    }

    /// Live state - never cached
    async fn get_training_status(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<TrainingResponse> {
        self.inner
            .get_training_status(project_id, training_id)
            .await
    }

    /// Live state - never cached
    async fn get_training_logs(
        &self,
        project_id: &str,
        training_id: &str,
        last_n: usize,
    ) -> Result<TrainingLogs> {
        self.inner
            .get_training_logs(project_id, training_id, last_n)
            .await
    }

    async fn get_training_summary(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<TrainingSummary> {
        let key = cache_key(OP_TRAINING_SUMMARY, &[project_id, training_id]);

        if let Some(cached) = self.get_cached::<TrainingSummary>(&key) {
            log::debug!("Cache hit: {}", OP_TRAINING_SUMMARY);
            return Ok(cached);
        }

        let tags = tags_for(OP_TRAINING_SUMMARY, Some(project_id));
        let seen = self.generation(&tags);
        let result = self
            .inner
            .get_training_summary(project_id, training_id)
            .await?;

        if let Some(ttl) = summary_ttl(&result) {
            self.set_cached(&key, &result, ttl, tags, seen);
        }
        Ok(result)
    }

    /// Binary download - never cached
    async fn download_model_weights(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<Vec<u8>> {
        self.inner
            .download_model_weights(project_id, training_id)
            .await
    }

    async fn get_training_config_options(&self) -> Result<TrainingConfigOptions> {
        self.fetch_cached(
            OP_CONFIG_OPTIONS,
            &[],
            None,
            CacheTtl::CONFIG_OPTIONS,
            || self.inner.get_training_config_options(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockForgeClient;
    use crate::client::mock::{list_item, project, summary, training};
    use crate::client::models::{ProjectStatus, TrainingStatus};
    use crate::error::ApiError;
    use tokio::time::advance;

    fn create_test_client(enabled: bool) -> CachedForgeClient<MockForgeClient> {
        CachedForgeClient::new(MockForgeClient::new(), enabled)
    }

    fn upload() -> DatasetUpload {
        DatasetUpload {
            file_name: "data.csv".to_string(),
            content: b"a\n1\n".to_vec(),
            dataset_type: "text".to_string(),
            visualization_prompt: None,
        }
    }

    fn status_key(project_id: &str) -> String {
        cache_key(OP_PROJECT_STATUS, &[project_id])
    }

    #[tokio::test]
    async fn test_cache_disabled_bypasses_cache() {
        let client = create_test_client(false);

        let _ = client.list_projects(20, 0).await;
        let _ = client.list_projects(20, 0).await;

        assert_eq!(client.inner.call_counts().await.list_projects, 2);
        assert!(client.cache_stats().is_none());
    }

    #[tokio::test]
    async fn test_list_projects_cached_per_page() {
        let client = CachedForgeClient::new(
            MockForgeClient::new()
                .with_projects(vec![list_item("p1", "A"), list_item("p2", "B")])
                .await,
            true,
        );

        let first = client.list_projects(1, 0).await.unwrap();
        let again = client.list_projects(1, 0).await.unwrap();
        let second_page = client.list_projects(1, 1).await.unwrap();

        assert_eq!(first[0].id, again[0].id);
        assert_eq!(second_page[0].id, "p2");
        assert_eq!(client.inner.call_counts().await.list_projects, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_projects_expires_after_two_minutes() {
        let client = create_test_client(true);

        client.list_projects(20, 0).await.unwrap();
        advance(CacheTtl::PROJECT_LIST - Duration::from_secs(1)).await;
        client.list_projects(20, 0).await.unwrap();
        assert_eq!(client.inner.call_counts().await.list_projects, 1);

        advance(Duration::from_secs(2)).await;
        client.list_projects(20, 0).await.unwrap();
        assert_eq!(client.inner.call_counts().await.list_projects, 2);
    }

    #[tokio::test]
    async fn test_create_project_invalidates_listings() {
        let client = create_test_client(true);

        client.list_projects(20, 0).await.unwrap();
        client.list_projects(10, 10).await.unwrap();
        client.get_project_status("p1").await.unwrap();

        client.create_project("New", "classify tickets").await.unwrap();

        assert!(
            client
                .get_cached::<Vec<ProjectListItem>>(&cache_key(OP_LIST_PROJECTS, &["20", "0"]))
                .is_none()
        );
        assert!(
            client
                .get_cached::<Vec<ProjectListItem>>(&cache_key(OP_LIST_PROJECTS, &["10", "10"]))
                .is_none()
        );
        // Unrelated reads survive
        assert!(client.get_cached::<ProjectResponse>(&status_key("p1")).is_some());
    }

    #[tokio::test]
    async fn test_failed_create_keeps_listings() {
        let client = create_test_client(true);
        client.list_projects(20, 0).await.unwrap();

        let client = CachedForgeClient {
            inner: Arc::new(
                MockForgeClient::new()
                    .with_error(ApiError::ServerError("boom".to_string()))
                    .await,
            ),
            cache: client.cache,
        };

        assert!(client.create_project("New", "x").await.is_err());
        assert!(
            client
                .get_cached::<Vec<ProjectListItem>>(&cache_key(OP_LIST_PROJECTS, &["20", "0"]))
                .is_some()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_project_status_cached_thirty_seconds() {
        let client = create_test_client(true);

        client.get_project_status("p1").await.unwrap();
        advance(Duration::from_secs(29)).await;
        client.get_project_status("p1").await.unwrap();
        assert_eq!(client.inner.call_counts().await.get_project_status, 1);

        advance(Duration::from_secs(2)).await;
        client.get_project_status("p1").await.unwrap();
        assert_eq!(client.inner.call_counts().await.get_project_status, 2);
    }

    #[tokio::test]
    async fn test_project_status_fresh_bypasses_and_refreshes() {
        let client = CachedForgeClient::new(
            MockForgeClient::new()
                .with_project_statuses(vec![
                    Ok(project("p1", ProjectStatus::Generating)),
                    Ok(project("p1", ProjectStatus::Ready)),
                ])
                .await,
            true,
        );

        let cached = client.get_project_status("p1").await.unwrap();
        let fresh = client.get_project_status_fresh("p1").await.unwrap();
        let after = client.get_project_status("p1").await.unwrap();

        assert_eq!(cached.status, ProjectStatus::Generating);
        assert_eq!(fresh.status, ProjectStatus::Ready);
        assert_eq!(after.status, ProjectStatus::Ready);
        assert_eq!(client.inner.call_counts().await.get_project_status, 2);
    }

    #[tokio::test]
    async fn test_upload_dataset_invalidates_project_entries() {
        let client = create_test_client(true);

        client.get_project_status("p1").await.unwrap();
        client.get_project_status("p10").await.unwrap();
        client.list_projects(20, 0).await.unwrap();
        assert!(client.get_cached::<ProjectResponse>(&status_key("p1")).is_some());

        client.upload_dataset("p1", upload()).await.unwrap();

        assert!(client.get_cached::<ProjectResponse>(&status_key("p1")).is_none());
        // Tags are exact: p10 is not "p1"
        assert!(client.get_cached::<ProjectResponse>(&status_key("p10")).is_some());
        assert!(
            client
                .get_cached::<Vec<ProjectListItem>>(&cache_key(OP_LIST_PROJECTS, &["20", "0"]))
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_start_training_invalidates_project_entries() {
        let client = CachedForgeClient::new(
            MockForgeClient::new()
                .with_summaries(vec![Ok(summary(SummaryStatus::Completed))])
                .await,
            true,
        );

        client.get_training_summary("p1", "t0").await.unwrap();
        client
            .start_training(TrainingRequest::new("p1"))
            .await
            .unwrap();
        client.get_training_summary("p1", "t0").await.unwrap();

        assert_eq!(client.inner.call_counts().await.get_training_summary, 2);
    }

    #[tokio::test]
    async fn test_delete_project_invalidates_project_and_listings() {
        let client = create_test_client(true);

        client.get_project_status("p1").await.unwrap();
        client.get_project_status("p2").await.unwrap();
        client.list_projects(20, 0).await.unwrap();

        client.delete_project("p1").await.unwrap();

        assert!(client.get_cached::<ProjectResponse>(&status_key("p1")).is_none());
        assert!(client.get_cached::<ProjectResponse>(&status_key("p2")).is_some());
        assert!(
            client
                .get_cached::<Vec<ProjectListItem>>(&cache_key(OP_LIST_PROJECTS, &["20", "0"]))
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_training_status_and_logs_never_cached() {
        let client = create_test_client(true);

        client.get_training_status("p1", "t1").await.unwrap();
        client.get_training_status("p1", "t1").await.unwrap();
        client.get_training_logs("p1", "t1", 50).await.unwrap();
        client.get_training_logs("p1", "t1", 50).await.unwrap();

        let counts = client.inner.call_counts().await;
        assert_eq!(counts.get_training_status, 2);
        assert_eq!(counts.get_training_logs, 2);
        assert_eq!(client.cache_stats().unwrap().total_entries, 0);
    }

    #[tokio::test]
    async fn test_downloads_never_cached() {
        let client = create_test_client(true);

        client.download_model_weights("p1", "t1").await.unwrap();
        client.download_model_weights("p1", "t1").await.unwrap();
        client.download_project_code("p1").await.unwrap();
        client.download_project_code("p1").await.unwrap();

        let counts = client.inner.call_counts().await;
        assert_eq!(counts.download_model_weights, 2);
        assert_eq!(counts.download_project_code, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_summary_cached_thirty_minutes() {
        let client = create_test_client(true);
        let key = cache_key(OP_TRAINING_SUMMARY, &["p1", "t1"]);

        let first = client.get_training_summary("p1", "t1").await.unwrap();
        let stored = client.cache.as_ref().unwrap().lock().unwrap().get(&key);

        advance(Duration::from_secs(29 * 60)).await;
        let second = client.get_training_summary("p1", "t1").await.unwrap();
        let still_stored = client.cache.as_ref().unwrap().lock().unwrap().get(&key);

        assert_eq!(client.inner.call_counts().await.get_training_summary, 1);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
        assert!(stored.is_some());
        assert_eq!(stored, still_stored);

        advance(Duration::from_secs(2 * 60)).await;
        client.get_training_summary("p1", "t1").await.unwrap();
        assert_eq!(client.inner.call_counts().await.get_training_summary, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generating_summary_expires_within_ten_seconds() {
        let client = CachedForgeClient::new(
            MockForgeClient::new()
                .with_summaries(vec![Ok(summary(SummaryStatus::Generating))])
                .await,
            true,
        );

        client.get_training_summary("p1", "t1").await.unwrap();
        advance(Duration::from_secs(5)).await;
        client.get_training_summary("p1", "t1").await.unwrap();
        assert_eq!(client.inner.call_counts().await.get_training_summary, 1);

        advance(Duration::from_secs(6)).await;
        client.get_training_summary("p1", "t1").await.unwrap();
        assert_eq!(client.inner.call_counts().await.get_training_summary, 2);
    }

    #[tokio::test]
    async fn test_pending_summary_not_cached() {
        let client = CachedForgeClient::new(
            MockForgeClient::new()
                .with_summaries(vec![Ok(summary(SummaryStatus::Pending))])
                .await,
            true,
        );

        client.get_training_summary("p1", "t1").await.unwrap();
        client.get_training_summary("p1", "t1").await.unwrap();

        assert_eq!(client.inner.call_counts().await.get_training_summary, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_options_and_analysis_ttls() {
        let client = CachedForgeClient::new(
            MockForgeClient::new()
                .with_analyses(vec![Ok(serde_json::from_str(
                    r#"{"project_id": "p1", "status": "completed"}"#,
                )
                .unwrap())])
                .await,
            true,
        );

        client.get_training_config_options().await.unwrap();
        client.get_dataset_analysis("p1").await.unwrap();

        advance(Duration::from_secs(6 * 60)).await;
        client.get_training_config_options().await.unwrap();
        client.get_dataset_analysis("p1").await.unwrap();

        let counts = client.inner.call_counts().await;
        assert_eq!(counts.get_training_config_options, 1);
        assert_eq!(counts.get_dataset_analysis, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let client = create_test_client(true);

        assert!(client.get_dataset_analysis("p1").await.is_err());
        assert!(client.get_dataset_analysis("p1").await.is_err());

        assert_eq!(client.inner.call_counts().await.get_dataset_analysis, 2);
    }

    #[tokio::test]
    async fn test_clear_and_stats() {
        let client = create_test_client(true);

        client.get_project_status("p1").await.unwrap();
        client.get_project_status("p1").await.unwrap();
        client.get_training_config_options().await.unwrap();

        let stats = client.cache_stats().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.hits, 1);

        assert_eq!(client.clear_cache(), 2);
        assert_eq!(client.cache_stats().unwrap().total_entries, 0);
    }

    #[tokio::test]
    async fn test_invalidate_matching_substring() {
        let client = create_test_client(true);

        client.get_project_status("p1").await.unwrap();
        client.get_project_status("p2").await.unwrap();

        assert_eq!(client.invalidate_matching("\"p1\""), 1);
        assert!(client.get_cached::<ProjectResponse>(&status_key("p2")).is_some());
    }

    #[tokio::test]
    async fn test_listing_in_flight_during_create_is_not_cached() {
        let client = create_test_client(true);

        client
            .fetch_cached(
                OP_LIST_PROJECTS,
                &["20", "0"],
                None,
                CacheTtl::PROJECT_LIST,
                || async {
                    // create lands after the listing request went out
                    client.create_project("New", "x").await?;
                    client.inner.list_projects(20, 0).await
                },
            )
            .await
            .unwrap();

        assert!(
            client
                .get_cached::<Vec<ProjectListItem>>(&cache_key(OP_LIST_PROJECTS, &["20", "0"]))
                .is_none()
        );
        client.list_projects(20, 0).await.unwrap();
        assert_eq!(client.inner.call_counts().await.list_projects, 2);
    }

    #[tokio::test]
    async fn test_fresh_status_during_upload_is_not_cached() {
        let client = create_test_client(true);
        let tags = tags_for(OP_PROJECT_STATUS, Some("p1"));
        let seen = client.generation(&tags);

        client.upload_dataset("p1", upload()).await.unwrap();
        let stale = client.inner.get_project_status("p1").await.unwrap();
        client.set_cached(&status_key("p1"), &stale, CacheTtl::PROJECT_STATUS, tags, seen);

        assert!(client.get_cached::<ProjectResponse>(&status_key("p1")).is_none());
    }

    #[tokio::test]
    async fn test_training_status_passthrough_values() {
        let client = CachedForgeClient::new(
            MockForgeClient::new()
                .with_training_statuses(vec![
                    Ok(training(TrainingStatus::Running)),
                    Ok(training(TrainingStatus::Completed)),
                ])
                .await,
            true,
        );

        let first = client.get_training_status("p1", "t1").await.unwrap();
        let second = client.get_training_status("p1", "t1").await.unwrap();

        assert_eq!(first.status, TrainingStatus::Running);
        assert_eq!(second.status, TrainingStatus::Completed);
    }
}
