use crate::config::{EngineConfig, MatchConfig};
use crate::core::{
    IdentifyResponse, MatchEntry, PillQuery, PillRecord, ResultSource, ScoredCandidate, DISCLAIMER,
};
use crate::error::{PillEngineError, Result};
use crate::matching::{difference_explanation, partition, Ranker, WeightedRanker};
use crate::providers::{PillProvider, RemotePillProvider};
use crate::store::{read_json_file, ImportSummary, InsertOutcome, PillStore, SqlitePillStore, StoreStats};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main pill identification orchestrator
pub struct PillEngine {
    store: Arc<dyn PillStore>,
    ranker: Arc<dyn Ranker>,
    providers: Vec<Arc<dyn PillProvider>>,
    config: MatchConfig,
    options: SearchOptions,
}

/// Search options/configuration
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Candidates requested per source and kept after ranking
    pub fetch_limit: usize,
    pub max_suggestions: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fetch_limit: 15,
            max_suggestions: 15,
        }
    }
}

impl PillEngine {
    /// Create new engine backed by a SQLite store with default tuning
    pub async fn new(db_path: impl AsRef<str>) -> Result<Self> {
        let store = Arc::new(SqlitePillStore::new(db_path.as_ref()).await?);
        Self::with_store(store, MatchConfig::default())
    }

    /// Build an engine from process settings, adding the remote provider when configured
    pub async fn from_config(config: &EngineConfig) -> Result<Self> {
        let match_config = config.match_config()?;
        let store = Arc::new(SqlitePillStore::new(&config.db_path).await?);

        let mut engine = Self::with_store(store, match_config)?.with_options(SearchOptions {
            fetch_limit: config.fetch_limit,
            max_suggestions: config.max_suggestions,
        });

        if let Some(url) = &config.remote_url {
            tracing::info!("Live pill source: {}", url);
            engine.add_provider(Arc::new(RemotePillProvider::new(url.as_str())?));
        }

        Ok(engine)
    }

    /// Create engine over any store; rejects an invalid config
    pub fn with_store(store: Arc<dyn PillStore>, config: MatchConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            ranker: Arc::new(WeightedRanker::new(config.clone())),
            providers: Vec::new(),
            config,
            options: SearchOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a live pill provider
    pub fn add_provider(&mut self, provider: Arc<dyn PillProvider>) {
        self.providers.push(provider);
    }

    pub fn match_config(&self) -> &MatchConfig {
        &self.config
    }

    /// Rank live candidates, falling back to the local store when no provider yields a match
    async fn ranked_candidates(
        &self,
        query: &PillQuery,
        limit: usize,
    ) -> Result<(Vec<ScoredCandidate>, ResultSource)> {
        let mut live = Vec::new();
        for provider in &self.providers {
            match provider.search(&query.imprint, limit).await {
                Ok(mut results) => {
                    tracing::debug!("Provider {} returned {} results", provider.name(), results.len());
                    live.append(&mut results);
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {}", provider.name(), e);
                }
            }
        }

        if !live.is_empty() {
            let ranked = self.ranker.rank(query, &live, limit);
            if !ranked.is_empty() {
                return Ok((ranked, ResultSource::Live));
            }
            tracing::debug!("No live candidate passed ranking for {}", query.imprint);
        }

        if !self.providers.is_empty() {
            tracing::warn!("Live search gave nothing for {}, falling back to local store", query.imprint);
        }

        let pool = self.store.all().await?;
        Ok((self.ranker.rank(query, &pool, limit), ResultSource::Local))
    }

    /// Identify a pill: rank by imprint, then split by the color/shape filters
    pub async fn identify(&self, query: PillQuery) -> Result<IdentifyResponse> {
        let start = Instant::now();
        let query = query.trimmed();

        if !query.is_searchable() {
            return Err(PillEngineError::NoImprint);
        }

        // Filters only decide exact vs potential, not the candidate pool
        let (ranked, source) = self
            .ranked_candidates(&query.imprint_only(), self.options.fetch_limit)
            .await?;

        if ranked.is_empty() {
            return Err(PillEngineError::NoMatches(query.imprint.clone()));
        }

        let color = query.color.as_deref();
        let shape = query.shape.as_deref();
        let buckets = partition(&ranked, color, shape, &self.config);

        let results = buckets
            .exact_matches
            .iter()
            .map(|c| MatchEntry::from_candidate(c, None))
            .collect();
        let potential_matches = buckets
            .potential_matches
            .iter()
            .map(|c| MatchEntry::from_candidate(c, Some(difference_explanation(&c.pill, color, shape))))
            .collect();

        let response = IdentifyResponse {
            imprint: query.imprint.clone(),
            search_color: query.color.clone(),
            search_shape: query.shape.clone(),
            results,
            potential_matches,
            disclaimer: DISCLAIMER.to_string(),
            source,
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
        };

        tracing::info!("{} ({:.1}ms)", response.display(), response.latency_ms);

        Ok(response)
    }

    /// Imprint autocomplete; never fails, errors yield no suggestions
    pub async fn suggest(&self, partial: &str) -> Vec<String> {
        let query = PillQuery::new(partial).trimmed();
        if !query.is_searchable() {
            return Vec::new();
        }

        let ranked = match self.ranked_candidates(&query, self.options.max_suggestions).await {
            Ok((ranked, _)) => ranked,
            Err(e) => {
                tracing::warn!("Suggest failed for {}: {}", query.imprint, e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        ranked
            .into_iter()
            .map(|c| c.pill.imprint)
            .filter(|imprint| !imprint.is_empty() && seen.insert(imprint.clone()))
            .take(self.options.max_suggestions)
            .collect()
    }

    /// Rank the local store with every filter applied
    pub async fn search_local(&self, query: PillQuery, limit: usize) -> Result<Vec<ScoredCandidate>> {
        let query = query.trimmed();
        if !query.is_searchable() {
            return Ok(Vec::new());
        }

        let pool = self.store.all().await?;
        Ok(self.ranker.rank(&query, &pool, limit))
    }

    /// Add a pill to the local store
    pub async fn add_pill(&self, pill: PillRecord) -> Result<InsertOutcome> {
        let outcome = self.store.insert(pill).await?;
        if let InsertOutcome::Duplicate(id) = outcome {
            tracing::info!("Skipped duplicate of pill #{}", id);
        }
        Ok(outcome)
    }

    /// Import a JSON array of pill records into the local store
    pub async fn import_json(&self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let pills = read_json_file(path)?;
        let summary = self.store.insert_many(pills).await?;
        tracing::info!("Imported {} pills, skipped {}", summary.inserted, summary.skipped);
        Ok(summary)
    }

    /// Get local store statistics
    pub async fn store_stats(&self) -> Result<StoreStats> {
        self.store.stats().await
    }

    /// Ranker name for logging
    pub fn ranker_name(&self) -> &str {
        self.ranker.name()
    }
}
