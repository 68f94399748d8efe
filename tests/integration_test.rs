use async_trait::async_trait;
use pill_identifier_engine::providers::PillProvider;
use pill_identifier_engine::{
    MatchConfig, PillEngine, PillEngineError, PillQuery, PillRecord, ResultSource, SqlitePillStore,
};
use std::io::Write;
use std::sync::Arc;

/// Provider answering every search with a fixed set of records
struct FixedProvider {
    pills: Vec<PillRecord>,
}

#[async_trait]
impl PillProvider for FixedProvider {
    async fn search(&self, _imprint: &str, limit: usize) -> pill_identifier_engine::Result<Vec<PillRecord>> {
        Ok(self.pills.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "fixed"
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Provider that is always down
struct FailingProvider;

#[async_trait]
impl PillProvider for FailingProvider {
    async fn search(&self, _imprint: &str, _limit: usize) -> pill_identifier_engine::Result<Vec<PillRecord>> {
        Err(PillEngineError::Provider {
            provider: "failing".to_string(),
            message: "HTTP 503".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }

    async fn is_available(&self) -> bool {
        false
    }
}

fn acetaminophen(color: &str, shape: &str, strength: &str) -> PillRecord {
    PillRecord::new("L484", "Acetaminophen")
        .with_appearance(color, shape)
        .with_strength(strength)
}

async fn engine_with(pills: Vec<PillRecord>) -> PillEngine {
    let store = SqlitePillStore::new(":memory:").await.unwrap().without_seed();
    let engine = PillEngine::with_store(Arc::new(store), MatchConfig::default()).unwrap();
    for pill in pills {
        engine.add_pill(pill).await.unwrap();
    }
    engine
}

#[tokio::test]
async fn test_identify_prefers_live_source() {
    let mut engine = engine_with(vec![acetaminophen("White", "Capsule/Oblong", "500 mg")]).await;
    engine.add_provider(Arc::new(FixedProvider {
        pills: vec![PillRecord::new("L484", "Acetaminophen (live)").with_appearance("White", "Oblong")],
    }));

    let response = engine.identify(PillQuery::new("L484").with_color("white")).await.unwrap();

    assert_eq!(response.source, ResultSource::Live);
    let best = response.best().unwrap();
    assert_eq!(best.pill.drug_name, "Acetaminophen (live)");
    assert_eq!(best.confidence, 100);
}

#[tokio::test]
async fn test_identify_falls_back_when_provider_fails() {
    let mut engine = engine_with(vec![acetaminophen("White", "Capsule/Oblong", "500 mg")]).await;
    engine.add_provider(Arc::new(FailingProvider));

    let response = engine.identify(PillQuery::new("L 484")).await.unwrap();

    assert_eq!(response.source, ResultSource::Local);
    assert_eq!(response.best().unwrap().pill.imprint, "L484");
}

#[tokio::test]
async fn test_identify_falls_back_when_provider_is_empty() {
    let mut engine = engine_with(vec![acetaminophen("White", "Capsule/Oblong", "500 mg")]).await;
    engine.add_provider(Arc::new(FixedProvider { pills: Vec::new() }));

    let response = engine.identify(PillQuery::new("L484")).await.unwrap();
    assert_eq!(response.source, ResultSource::Local);
    assert_eq!(response.results.len(), 1);
}

#[tokio::test]
async fn test_identify_no_matches() {
    let engine = engine_with(Vec::new()).await;

    let result = engine.identify(PillQuery::new("L484")).await;
    assert!(matches!(result, Err(PillEngineError::NoMatches(imprint)) if imprint == "L484"));
}

#[tokio::test]
async fn test_identify_blank_imprint() {
    let engine = engine_with(vec![acetaminophen("White", "Capsule/Oblong", "500 mg")]).await;

    let result = engine.identify(PillQuery::new("   ").with_color("white")).await;
    assert!(matches!(result, Err(PillEngineError::NoImprint)));
}

#[tokio::test]
async fn test_identify_partitions_by_filters() {
    let engine = engine_with(vec![
        acetaminophen("White", "Capsule/Oblong", "500 mg"),
        acetaminophen("White", "Oblong", "325 mg"),
        acetaminophen("White", "Capsule", "650 mg"),
        acetaminophen("White", "Capsule/Oblong", "750 mg"),
        acetaminophen("Blue", "Round", "80 mg"),
    ])
    .await;

    let query = PillQuery::new("L484").with_color("White").with_shape("capsule");
    let response = engine.identify(query).await.unwrap();

    let strengths: Vec<&str> = response.results.iter().map(|e| e.pill.strength.as_str()).collect();
    assert_eq!(strengths, vec!["500 mg", "325 mg", "650 mg"]);
    assert!(response.results.iter().all(|e| e.difference.is_none()));

    assert_eq!(response.potential_matches.len(), 1);
    let potential = &response.potential_matches[0];
    assert_eq!(potential.pill.color, "Blue");
    assert_eq!(
        potential.difference.as_deref(),
        Some("Different color (this pill is Blue) and shape (this pill is Round).")
    );

    assert_eq!(response.search_color.as_deref(), Some("White"));
    assert_eq!(
        response.results[0].pill.image_url.as_deref(),
        Some("https://www.drugs.com/images/pills/mtm/L484.JPG")
    );
}

#[tokio::test]
async fn test_identify_response_json_shape() {
    let engine = engine_with(vec![acetaminophen("White", "Capsule/Oblong", "500 mg")]).await;
    let response = engine.identify(PillQuery::new("L484")).await.unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["imprint"], "L484");
    assert_eq!(json["source"], "local");
    assert!(json["potentialMatches"].as_array().unwrap().is_empty());
    assert_eq!(json["results"][0]["drug_name"], "Acetaminophen");
    assert_eq!(json["results"][0]["confidence"], 100);
}

#[tokio::test]
async fn test_suggest_deduplicates_imprints() {
    let engine = engine_with(vec![
        acetaminophen("White", "Capsule/Oblong", "500 mg"),
        acetaminophen("White", "Capsule/Oblong", "325 mg"),
        PillRecord::new("M367", "Hydrocodone"),
    ])
    .await;

    let suggestions = engine.suggest("l48").await;

    assert_eq!(suggestions[0], "L484");
    assert_eq!(suggestions.iter().filter(|s| *s == "L484").count(), 1);
    assert!(engine.suggest("  ").await.is_empty());
}

#[tokio::test]
async fn test_add_pill_visible_to_next_identify() {
    let engine = engine_with(Vec::new()).await;
    engine
        .add_pill(PillRecord::new("M 30", "Oxycodone").with_appearance("Blue", "Round"))
        .await
        .unwrap();

    let response = engine.identify(PillQuery::new("m30").with_shape("circle")).await.unwrap();
    let best = response.best().unwrap();
    assert_eq!(best.pill.imprint, "M 30");
    assert_eq!(best.confidence, 100);
}

#[tokio::test]
async fn test_search_local_applies_filters() {
    let engine = engine_with(vec![
        acetaminophen("Blue", "Round", "80 mg"),
        acetaminophen("White", "Capsule/Oblong", "500 mg"),
    ])
    .await;

    let query = PillQuery::new("L484").with_color("white").with_shape("oblong");
    let ranked = engine.search_local(query, 3).await.unwrap();

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].pill.color, "White");
    assert_eq!(ranked[0].confidence_percent(), 100);
    assert_eq!(ranked[1].confidence_percent(), 72);
}

#[tokio::test]
async fn test_import_json_and_stats() {
    let engine = engine_with(Vec::new()).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"imprint": "IP 109", "drug_name": "Hydrocodone/Acetaminophen", "color": "White",
              "shape": "Capsule/Oblong", "strength": "325 mg / 5 mg", "uses": ["Pain"]}},
            {{"imprint": "IP 109", "drug_name": "Hydrocodone/Acetaminophen", "strength": "325 mg / 5 mg"}},
            {{"imprint": "IBU 800", "drug_name": "Ibuprofen"}}
        ]"#
    )
    .unwrap();

    let summary = engine.import_json(file.path()).await.unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped, 1);

    let stats = engine.store_stats().await.unwrap();
    assert_eq!(stats.total_pills, 2);
    assert_eq!(stats.distinct_imprints, 2);

    let response = engine.identify(PillQuery::new("ip109")).await.unwrap();
    assert_eq!(response.best().unwrap().pill.uses, "Pain");
}

#[tokio::test]
async fn test_import_json_missing_file() {
    let engine = engine_with(Vec::new()).await;
    let result = engine.import_json("/nonexistent/pills.json").await;
    assert!(matches!(result, Err(PillEngineError::Io(_))));
}

#[tokio::test]
async fn test_concurrent_identify() {
    let engine = Arc::new(PillEngine::new(":memory:").await.unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.identify(PillQuery::new("L484")).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.best().unwrap().pill.imprint, "L484");
    }
}
