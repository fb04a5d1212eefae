//! Rendering of recognition outcomes and configuration errors as diagnostics.

mod common;

use common::*;
use miette::{Diagnostic, Report};
use pulsar::{Cardinality, Literal, Pattern, PulsarError, RecognitionReport};

/// Renders a report without colors or unicode so assertions stay stable.
fn render(report: RecognitionReport) -> String {
    let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    let mut output = String::new();
    handler.render_report(&mut output, &report).unwrap();
    output
}

#[test]
fn test_partial_report_points_at_malformed_region() {
    let source = "(1+2";
    let (result, _) = recognize(&expression_grammar(), source);
    let report = RecognitionReport::from_result(&result, "expr.txt", source).unwrap();
    assert_eq!(report.symbol(), "expr/[sequence]/term");

    let output = render(report);
    assert!(output.contains("malformed `expr/[sequence]/term` starting at position 0"));
    assert!(output.contains("consumed 4 characters before failing at position 4"));
    assert!(output.contains("expr.txt"));
}

#[test]
fn test_failed_report_labels_failure_position() {
    let source = "aed";
    let (result, _) = recognize(&abd_grammar(), source);
    let report = RecognitionReport::from_result(&result, "input", source).unwrap();
    let output = render(report);
    assert!(output.contains("no match for rule `S`"));
    assert!(output.contains("no match here"));
}

#[test]
fn test_success_produces_no_report() {
    let (result, _) = recognize(&abd_grammar(), "abd");
    assert!(RecognitionReport::from_result(&result, "input", "abd").is_none());
}

#[test]
fn test_configuration_error_codes() {
    let cases: Vec<(PulsarError, &str)> = vec![
        (Cardinality::between(2, 1).unwrap_err(), "pulsar::cardinality::invalid"),
        (Literal::new("").unwrap_err(), "pulsar::invalid_argument"),
        (Pattern::new("[").unwrap_err(), "pulsar::rules::invalid_pattern"),
    ];
    for (err, code) in cases {
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some(code));
    }
}

#[test]
fn test_invalid_pattern_keeps_regex_source() {
    let err = Pattern::new("a(").unwrap_err();
    assert_eq!(err.to_string(), "invalid pattern `a(`");
    assert!(std::error::Error::source(&err).is_some());
    let rendered = format!("{:?}", Report::new(err));
    assert!(rendered.contains("invalid pattern"));
}
