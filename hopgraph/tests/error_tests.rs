//! Error categories, provider failures and loading errors

#[path = "testutils/mod.rs"]
mod testutils;

use hopgraph::{
    Dataset, EngineConfig, ErrorKind, ExecutionError, InMemoryGraph, QueryCoordinator, QueryError,
    StorageError,
};
use std::io::Write;
use std::sync::Arc;
use testutils::providers::{CountingProvider, FailingProvider};
use testutils::test_fixture::TestFixture;

const NBA: &str = include_str!("testutils/nba.json");

fn counting_coordinator() -> (QueryCoordinator, Arc<CountingProvider<InMemoryGraph>>) {
    let (catalog, graph) = Dataset::from_json_str(NBA)
        .and_then(Dataset::build)
        .expect("valid dataset");
    let provider = Arc::new(CountingProvider::new(graph));
    let coordinator = QueryCoordinator::new(
        Arc::new(catalog),
        Arc::clone(&provider) as _,
        EngineConfig::default(),
    )
    .expect("valid config");
    (coordinator, provider)
}

#[test]
fn test_rejected_queries_never_reach_provider() {
    let (coordinator, provider) = counting_coordinator();

    let rejected = [
        (r#"GO FROM "Tim Duncan" OVR like"#, ErrorKind::Syntax),
        (r#"GO FROM "Tim Duncan" OVER like YIELD"#, ErrorKind::Syntax),
        (r#"GO FROM "Tim Duncan" OVER friend"#, ErrorKind::Semantic),
        (r#"GO FROM "Tim Duncan" OVER like YIELD serve._dst"#, ErrorKind::Semantic),
        (r#"GO FROM $-.id OVER like"#, ErrorKind::Semantic),
        (r#"GO 1000 STEPS FROM "Tim Duncan" OVER like"#, ErrorKind::Semantic),
        ("YIELD 1 AS x UNION YIELD 1 AS x, 2 AS y", ErrorKind::Semantic),
        (
            r#"GO FROM "Tim Duncan" OVER like; GO FROM "Tony Parker" OVER friend"#,
            ErrorKind::Semantic,
        ),
    ];
    for (query, kind) in rejected {
        let error = coordinator
            .process_query(query)
            .expect_err(&format!("query should fail: {}", query));
        assert_eq!(error.kind(), kind, "wrong category for {}: {}", query, error);
    }
    assert_eq!(provider.total_calls(), 0);

    // explain validates without executing
    coordinator
        .explain(r#"GO 3 STEPS FROM "Tim Duncan" OVER like"#)
        .expect("valid query");
    assert!(coordinator.is_valid_query(r#"FIND ALL PATH FROM "Tim Duncan" TO "Tony Parker" OVER like"#));
    assert_eq!(provider.total_calls(), 0);

    coordinator
        .process_query(r#"GO FROM "Tim Duncan" OVER like"#)
        .expect("valid query");
    assert!(provider.neighbor_calls() > 0);
}

#[test]
fn test_provider_failure_is_execution_error() {
    let (catalog, _) = Dataset::from_json_str(NBA)
        .and_then(Dataset::build)
        .expect("valid dataset");
    let coordinator = QueryCoordinator::new(
        Arc::new(catalog),
        Arc::new(FailingProvider),
        EngineConfig::default(),
    )
    .expect("valid config");

    for query in [
        r#"GO FROM "Tim Duncan" OVER like"#,
        r#"FIND SHORTEST PATH FROM "Tim Duncan" TO "Tony Parker" OVER like"#,
    ] {
        let error = coordinator.process_query(query).expect_err("provider fails");
        assert_eq!(error.kind(), ErrorKind::Execution);
        assert!(matches!(
            error,
            QueryError::Execution(ExecutionError::StorageError(StorageError::Unavailable(_)))
        ));
    }

    // constant YIELD needs no graph data
    coordinator.process_query("YIELD 1 + 1 AS two").expect("no provider call");
    assert!(coordinator.running_queries().is_empty());
}

#[test]
fn test_empty_results_are_not_errors() {
    let fixture = TestFixture::nba().expect("Failed to load NBA fixture");
    for query in [
        r#"GO FROM "Not Exist" OVER like"#,
        r#"GO FROM "Tim Duncan" OVER like WHERE like.likeness > 100"#,
        r#"FIND SHORTEST PATH FROM "Tony Parker" TO "LeBron James" OVER like"#,
        r#"GO FROM "Tim Duncan" OVER like YIELD like._dst AS id INTERSECT GO FROM "LeBron James" OVER like YIELD like._dst AS id"#,
    ] {
        let result = fixture.assert_query_succeeds(query);
        assert!(result.is_empty(), "expected no rows for {}", query);
        assert!(!result.columns().is_empty());
    }
}

#[test]
fn test_load_dataset_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(NBA.as_bytes()).expect("write dataset");

    let coordinator =
        QueryCoordinator::from_json_file(file.path(), EngineConfig::default()).expect("load");
    let result = coordinator
        .process_query(r#"GO FROM "Tim Duncan" OVER like"#)
        .expect("query");
    assert_eq!(result.row_count(), 2);

    let missing = QueryCoordinator::from_json_file("/nonexistent/dataset.json", EngineConfig::default());
    assert!(matches!(
        missing,
        Err(ExecutionError::StorageError(StorageError::Dataset(_)))
    ));
}

#[test]
fn test_invalid_datasets_are_rejected() {
    let schema = r#"{"vid_type": "string", "tags": [{"name": "player", "properties": [{"name": "age", "type": "int"}]}], "edge_types": [{"name": "like", "properties": []}]}"#;

    let unknown_edge_type = format!(
        r#"{{"schema": {}, "vertices": [], "edges": [{{"type": "follow", "src": "a", "dst": "b"}}]}}"#,
        schema
    );
    let wrong_vid_type = format!(
        r#"{{"schema": {}, "vertices": [{{"id": 7, "tags": {{}}}}], "edges": []}}"#,
        schema
    );
    let wrong_property_type = format!(
        r#"{{"schema": {}, "vertices": [{{"id": "a", "tags": {{"player": {{"age": "old"}}}}}}], "edges": []}}"#,
        schema
    );

    for json in [&unknown_edge_type, &wrong_vid_type, &wrong_property_type] {
        let built = Dataset::from_json_str(json).and_then(Dataset::build);
        assert!(built.is_err(), "dataset should be rejected: {}", json);
    }

    assert!(matches!(
        Dataset::from_json_str("{ not json"),
        Err(StorageError::Dataset(_))
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EngineConfig {
        default_path_steps: 10,
        max_steps: 5,
        ..EngineConfig::default()
    };
    let (catalog, graph) = Dataset::from_json_str(NBA)
        .and_then(Dataset::build)
        .expect("valid dataset");
    let error = QueryCoordinator::new(Arc::new(catalog), Arc::new(graph), config)
        .err()
        .expect("config rejected");
    assert!(matches!(error, ExecutionError::Configuration(_)));

    let config = EngineConfig::from_json_str(r#"{"max_steps": 8, "parallel_expansion": false}"#)
        .expect("partial config");
    assert_eq!(config.max_steps, 8);
    assert!(!config.parallel_expansion);
    assert_eq!(config.default_path_steps, 5);

    assert!(EngineConfig::from_json_str(r#"{"parallel_threshold": 0}"#).is_err());
    assert!(EngineConfig::from_json_str(r#"{"max_steps": "many"}"#).is_err());
}

#[test]
fn test_step_bounds_follow_config() {
    let config = EngineConfig {
        max_steps: 3,
        default_path_steps: 3,
        ..EngineConfig::default()
    };
    let fixture = TestFixture::nba_with_config(config).expect("Failed to load NBA fixture");
    fixture.assert_query_succeeds(r#"GO 3 STEPS FROM "Tim Duncan" OVER like"#);
    let error = fixture.assert_query_fails(r#"GO 4 STEPS FROM "Tim Duncan" OVER like"#);
    assert_eq!(error.kind(), ErrorKind::Semantic);
}
