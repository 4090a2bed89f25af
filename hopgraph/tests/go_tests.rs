//! Integration tests for GO traversals over the NBA sample graph

#[path = "testutils/mod.rs"]
mod testutils;

use hopgraph::{QueryError, SemanticError, Value};
use testutils::test_fixture::{column_set, column_strings, sorted_column, sorted_rows, strings, TestFixture};

fn fixture() -> TestFixture {
    TestFixture::nba().expect("Failed to load NBA fixture")
}

#[test]
fn test_one_step_default_projection() {
    let fixture = fixture();
    let result = fixture.assert_row_count(r#"GO FROM "Tim Duncan" OVER like"#, 2);
    assert_eq!(result.columns(), &strings(&["like._dst"])[..]);
    assert_eq!(
        sorted_column(&result, 0),
        strings(&["Manu Ginobili", "Tony Parker"])
    );
}

#[test]
fn test_yield_edge_and_vertex_properties() {
    let fixture = fixture();
    let result = fixture.assert_query_succeeds(
        r#"GO FROM "Tony Parker" OVER serve
           YIELD $^.player.name AS player, $$.team.name AS team, serve.start_year AS since"#,
    );
    assert_eq!(result.columns(), &strings(&["player", "team", "since"])[..]);
    assert_eq!(
        sorted_rows(&result),
        vec![
            strings(&["Tony Parker", "Hornets", "2018"]),
            strings(&["Tony Parker", "Spurs", "1999"]),
        ]
    );
    assert!(matches!(result.rows()[0].values[2], Value::Int(_)));
}

#[test]
fn test_multi_step_traversal() {
    let fixture = fixture();

    let result = fixture.assert_row_count(r#"GO 2 STEPS FROM "Tony Parker" OVER like"#, 5);
    assert_eq!(
        sorted_column(&result, 0),
        strings(&[
            "Manu Ginobili",
            "Tim Duncan",
            "Tim Duncan",
            "Tony Parker",
            "Tony Parker"
        ])
    );

    // the step-2 frontier is deduplicated: {Tim Duncan, Manu Ginobili, Tony Parker}
    fixture.assert_row_count(r#"GO 3 STEPS FROM "Tony Parker" OVER like"#, 6);
}

#[test]
fn test_step_range_and_distinct() {
    let fixture = fixture();
    fixture.assert_row_count(r#"GO 1 TO 2 STEPS FROM "Tony Parker" OVER like"#, 8);

    let result = fixture.assert_row_count(
        r#"GO 1 TO 2 STEPS FROM "Tony Parker" OVER like YIELD DISTINCT like._dst"#,
        4,
    );
    assert_eq!(
        sorted_column(&result, 0),
        strings(&[
            "LaMarcus Aldridge",
            "Manu Ginobili",
            "Tim Duncan",
            "Tony Parker"
        ])
    );
}

#[test]
fn test_reversely() {
    let fixture = fixture();
    let result = fixture.assert_row_count(r#"GO FROM "Tim Duncan" OVER like REVERSELY"#, 10);
    assert_eq!(
        sorted_column(&result, 0),
        strings(&[
            "Aron Baynes",
            "Boris Diaw",
            "Danny Green",
            "Dejounte Murray",
            "LaMarcus Aldridge",
            "Manu Ginobili",
            "Marco Belinelli",
            "Shaquile O'Neal",
            "Tiago Splitter",
            "Tony Parker"
        ])
    );

    // pseudo-properties follow the traversal: _src is the vertex expanded from
    let result = fixture.assert_query_succeeds(
        r#"GO FROM "Tim Duncan" OVER like REVERSELY YIELD DISTINCT like._src AS src"#,
    );
    assert_eq!(column_strings(&result, 0), strings(&["Tim Duncan"]));
}

#[test]
fn test_bidirect() {
    let fixture = fixture();
    fixture.assert_row_count(r#"GO FROM "Tim Duncan" OVER like BIDIRECT"#, 12);
    fixture.assert_row_count(
        r#"GO FROM "Tim Duncan" OVER like BIDIRECT YIELD DISTINCT like._dst"#,
        10,
    );
}

#[test]
fn test_where_on_edge_property() {
    let fixture = fixture();
    let result = fixture.assert_row_count(
        r#"GO FROM "Tony Parker" OVER like WHERE like.likeness > 90"#,
        2,
    );
    assert_eq!(
        sorted_column(&result, 0),
        strings(&["Manu Ginobili", "Tim Duncan"])
    );
}

#[test]
fn test_where_applies_at_every_hop() {
    let fixture = fixture();
    // LaMarcus Aldridge (90) survives hop 1 but his 75-likeness edges are dropped at hop 2
    let result = fixture.assert_row_count(
        r#"GO 2 STEPS FROM "Tony Parker" OVER like WHERE like.likeness >= 90"#,
        3,
    );
    assert_eq!(
        sorted_column(&result, 0),
        strings(&["Manu Ginobili", "Tim Duncan", "Tony Parker"])
    );
}

#[test]
fn test_where_on_destination_property() {
    let fixture = fixture();
    let result = fixture.assert_query_succeeds(
        r#"GO FROM "Tim Duncan" OVER like REVERSELY WHERE $$.player.age < 33 YIELD $$.player.name AS name"#,
    );
    assert_eq!(
        sorted_column(&result, 0),
        strings(&["Aron Baynes", "Danny Green", "Dejounte Murray", "Marco Belinelli"])
    );
}

#[test]
fn test_zero_hop_rows() {
    let fixture = fixture();
    let result = fixture.assert_row_count(
        r#"GO 0 TO 1 STEPS FROM "Tim Duncan" OVER like YIELD $^.player.name"#,
        3,
    );
    assert_eq!(column_set(&result, 0).len(), 1);
    assert_eq!(result.columns(), &strings(&["$^.player.name"])[..]);

    // edge references have no value at hop 0, so hop-0 rows are not produced
    fixture.assert_row_count(r#"GO 0 TO 1 STEPS FROM "Tim Duncan" OVER like"#, 2);

    // a missing origin produces no hop-0 row
    fixture.assert_row_count(
        r#"GO 0 TO 1 STEPS FROM "Not Exist" OVER like YIELD $^.player.name"#,
        0,
    );
}

#[test]
fn test_over_all_edge_types() {
    let fixture = fixture();
    let result = fixture.assert_row_count(r#"GO FROM "Tim Duncan" OVER *"#, 7);
    assert_eq!(
        result.columns(),
        &strings(&["serve._dst", "like._dst", "teammate._dst"])[..]
    );
    for row in result.rows() {
        let present = row.values.iter().filter(|v| !v.is_null()).count();
        assert_eq!(present, 1, "exactly one edge type matches each row");
    }
}

#[test]
fn test_over_several_edge_types_with_type_and_rank() {
    let fixture = fixture();
    let result = fixture.assert_query_succeeds(
        r#"GO FROM "Marco Belinelli" OVER serve WHERE serve._dst == "Spurs"
           YIELD serve._type AS type, serve._rank AS rank, serve.start_year AS since"#,
    );
    assert_eq!(
        sorted_rows(&result),
        vec![
            strings(&["serve", "0", "2013"]),
            strings(&["serve", "1", "2018"]),
        ]
    );
}

#[test]
fn test_multiple_origins_are_deduplicated() {
    let fixture = fixture();
    fixture.assert_row_count(
        r#"GO FROM "Tim Duncan", "Tim Duncan", "Tony Parker" OVER like"#,
        5,
    );
}

#[test]
fn test_missing_vertex_yields_empty_result_with_columns() {
    let fixture = fixture();
    let result = fixture.assert_row_count(
        r#"GO FROM "Not Exist" OVER like YIELD like._dst AS id, $$.player.age AS age"#,
        0,
    );
    assert_eq!(result.columns(), &strings(&["id", "age"])[..]);

    // a vertex without outgoing edges of the type
    fixture.assert_row_count(r#"GO FROM "Nobody" OVER like"#, 0);
}

#[test]
fn test_string_predicates() {
    let fixture = fixture();
    let result = fixture.assert_query_succeeds(
        r#"GO FROM "Tim Duncan" OVER like REVERSELY WHERE $$.player.name CONTAINS "a" AND $$.player.name =~ ".*r$" YIELD $$.player.name"#,
    );
    assert_eq!(
        sorted_column(&result, 0),
        strings(&["Tiago Splitter", "Tony Parker"])
    );

    // the pattern must match the whole name
    fixture.assert_row_count(
        r#"GO FROM "Tim Duncan" OVER like WHERE $$.player.name =~ "Tony""#,
        0,
    );
}

#[test]
fn test_arithmetic_in_yield() {
    let fixture = fixture();
    let result = fixture.assert_query_succeeds(
        r#"GO FROM "Tim Duncan" OVER like YIELD like.likeness * 2 + 1 AS score, $^.player.age / 2.0 AS half"#,
    );
    assert_eq!(column_strings(&result, 0), strings(&["191", "191"]));
    assert_eq!(result.rows()[0].values[1], Value::Double(21.0));
}

#[test]
fn test_integer_literal_extremes() {
    let fixture = fixture();
    let result = fixture.assert_query_succeeds(
        "YIELD -9223372036854775808 AS lo, 9223372036854775807 AS hi, -9223372036854775807 - 1 == -9223372036854775808 AS same",
    );
    assert_eq!(result.rows()[0].values[0], Value::Int(i64::MIN));
    assert_eq!(result.rows()[0].values[1], Value::Int(i64::MAX));
    assert_eq!(result.rows()[0].values[2], Value::Bool(true));

    let error = fixture.assert_query_fails("YIELD 9223372036854775808 AS x");
    assert!(matches!(error, QueryError::Syntax(_)));
}

#[test]
fn test_go_semantic_errors() {
    let fixture = fixture();

    let error = fixture.assert_query_fails(r#"GO FROM "Tim Duncan" OVER like YIELD serve.start_year"#);
    assert!(matches!(
        error,
        QueryError::Semantic(SemanticError::EdgeNotInOver(ref edge)) if edge == "serve"
    ));

    let error = fixture.assert_query_fails(r#"GO FROM "Tim Duncan" OVER friend"#);
    assert!(matches!(error, QueryError::Semantic(SemanticError::Catalog(_))));

    let error = fixture.assert_query_fails(r#"GO FROM "Tim Duncan" OVER like YIELD $$.player.height"#);
    assert!(matches!(error, QueryError::Semantic(SemanticError::Catalog(_))));

    let error = fixture.assert_query_fails(r#"GO 3 TO 2 STEPS FROM "Tim Duncan" OVER like"#);
    assert!(matches!(
        error,
        QueryError::Semantic(SemanticError::InvalidStepRange { min: 3, max: 2 })
    ));

    let error = fixture.assert_query_fails(r#"GO FROM 42 OVER like"#);
    assert!(matches!(
        error,
        QueryError::Semantic(SemanticError::VidTypeMismatch { .. })
    ));

    let error = fixture.assert_query_fails(r#"GO FROM "Tim Duncan" OVER like WHERE like.likeness + 1"#);
    assert!(matches!(error, QueryError::Semantic(SemanticError::TypeMismatch(_))));
}

#[test]
fn test_step_limit() {
    let fixture = fixture();
    let error = fixture.assert_query_fails(r#"GO 1000 STEPS FROM "Tim Duncan" OVER like"#);
    assert!(matches!(
        error,
        QueryError::Semantic(SemanticError::StepLimitExceeded { steps: 1000, .. })
    ));
}
