//! Tests for error message formatting.

use hl7tmpl::{HelperError, compute_suggestions};

#[test]
fn compute_suggestions_finds_similar_names() {
    let available = ["getSegmentLists", "getFirstSegments", "hasSegments"];

    let suggestions = compute_suggestions("getSegmentLst", available);
    assert_eq!(suggestions, vec!["getSegmentLists"]);

    let suggestions = compute_suggestions("xyz", available);
    assert!(suggestions.is_empty());
}

#[test]
fn compute_suggestions_excludes_exact_match_and_limits_to_three() {
    let names: Vec<String> = (0..10).map(|i| format!("seg{i}")).collect();
    let suggestions = compute_suggestions("seg", names.iter().map(String::as_str));
    assert_eq!(suggestions.len(), 3);

    let suggestions = compute_suggestions("seg1", names.iter().map(String::as_str));
    assert!(!suggestions.contains(&"seg1".to_string()));
}

#[test]
fn short_names_allow_one_edit() {
    let suggestions = compute_suggestions("PD", ["PID", "PV1", "PDA"]);
    assert_eq!(suggestions, vec!["PID", "PDA"]);
}

#[test]
fn invalid_input_display() {
    let err = HelperError::invalid_input(
        "getFieldRepeats",
        "expected a parsed field value, got a string",
    );
    insta::assert_snapshot!(err, @"getFieldRepeats: expected a parsed field value, got a string");
}

#[test]
fn resolution_display() {
    let err = HelperError::Resolution {
        helper: "evaluate",
        name: "../x.hbs".to_string(),
        reason: "template names must be relative paths inside the template root".to_string(),
    };
    insta::assert_snapshot!(
        err,
        @"evaluate: cannot resolve template '../x.hbs': template names must be relative paths inside the template root"
    );
}

#[test]
fn unknown_helper_display() {
    let err = HelperError::UnknownHelper {
        name: "hasSegment".to_string(),
        suggestions: vec!["hasSegments".to_string()],
    };
    insta::assert_snapshot!(err, @"unknown helper 'hasSegment'; did you mean: hasSegments?");

    let err = HelperError::UnknownHelper {
        name: "zzz".to_string(),
        suggestions: Vec::new(),
    };
    insta::assert_snapshot!(err, @"unknown helper 'zzz'");
}

#[test]
fn parse_display_keeps_source() {
    use std::error::Error;

    let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
    let err = HelperError::Parse {
        helper: "evaluate",
        name: "t.hbs".to_string(),
        source,
    };
    assert!(
        err.to_string()
            .starts_with("evaluate: output of template 't.hbs' is not valid JSON: ")
    );
    assert!(err.source().is_some());
}
