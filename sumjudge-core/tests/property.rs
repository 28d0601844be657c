//! Property-based tests for the judge output parsers using proptest

use proptest::prelude::*;
use serde_json::json;
use sumjudge::{
    all_categories, parse_alignment, parse_fact_check, Provenance, NO_ERROR,
};

// =========================================================================
// Strategies
// =========================================================================

/// Free text that cannot close the record array early.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.'!?-]{0,40}"
}

fn arb_category() -> impl Strategy<Value = String> {
    let known: Vec<String> = all_categories().map(str::to_string).collect();
    prop_oneof![
        3 => prop::sample::select(known),
        1 => Just("No Error".to_string()),
        1 => "[a-z ]{1,20}",
    ]
}

fn arb_fact_check_records() -> impl Strategy<Value = Vec<(String, String, String)>> {
    prop::collection::vec((arb_text(), arb_text(), arb_category()), 1..12)
}

fn render_fact_check(records: &[(String, String, String)], pretty: bool) -> String {
    let value = serde_json::Value::Array(
        records
            .iter()
            .map(|(sentence, reason, category)| {
                json!({"sentence": sentence, "reason": reason, "category": category})
            })
            .collect(),
    );
    if pretty {
        serde_json::to_string_pretty(&value).unwrap()
    } else {
        value.to_string()
    }
}

// =========================================================================
// Fact checking
// =========================================================================

proptest! {
    #[test]
    fn prop_well_formed_array_lengths_match(
        records in arb_fact_check_records(),
        pretty in any::<bool>(),
        preamble in "[a-zA-Z ]{0,30}",
    ) {
        let raw = format!("{}\n{}", preamble, render_fact_check(&records, pretty));
        let parsed = parse_fact_check(&raw);

        prop_assert_eq!(parsed.provenance, Provenance::Exact);
        prop_assert_eq!(parsed.value.labels.len(), records.len());
        prop_assert_eq!(parsed.value.error_types.len(), records.len());
        for ((_, _, category), label) in records.iter().zip(&parsed.value.labels) {
            let expected = if category.to_lowercase() == NO_ERROR { 0 } else { 1 };
            prop_assert_eq!(*label, expected);
        }
    }

    #[test]
    fn prop_reparse_of_reserialized_output_is_stable(records in arb_fact_check_records()) {
        let first = parse_fact_check(&render_fact_check(&records, false)).into_inner();

        let echoed: Vec<_> = first
            .error_types
            .iter()
            .map(|category| (String::new(), String::new(), category.clone()))
            .collect();
        let second = parse_fact_check(&render_fact_check(&echoed, true)).into_inner();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_fact_check_never_panics(raw in any::<String>()) {
        let parsed = parse_fact_check(&raw);
        prop_assert_eq!(parsed.value.labels.len(), parsed.value.error_types.len());
        prop_assert_eq!(parsed.value.is_success(), parsed.provenance != Provenance::Failed);
        if let Some(score) = parsed.value.faithfulness() {
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}

// =========================================================================
// Alignment
// =========================================================================

fn arb_alignment_records() -> impl Strategy<Value = Vec<(bool, Vec<i64>)>> {
    prop::collection::vec(
        (any::<bool>(), prop::collection::vec(-2i64..20, 0..4)),
        1..10,
    )
}

proptest! {
    #[test]
    fn prop_alignment_labels_and_lines(records in arb_alignment_records()) {
        let payload: Vec<_> = records
            .iter()
            .enumerate()
            .map(|(i, (yes, lines))| {
                json!({
                    "key fact": format!("fact {}", i),
                    "response": if *yes { "Yes" } else { "No" },
                    "line number": lines,
                })
            })
            .collect();
        let raw = format!("```json\n{}\n```", serde_json::to_string_pretty(&payload).unwrap());
        let parsed = parse_alignment(&raw);

        prop_assert_eq!(parsed.provenance, Provenance::Exact);
        let expected_labels: Vec<u8> = records.iter().map(|(yes, _)| u8::from(*yes)).collect();
        prop_assert_eq!(&parsed.value.labels, &expected_labels);

        let expected_lines: std::collections::BTreeSet<i64> =
            records.iter().flat_map(|(_, lines)| lines.iter().copied()).collect();
        prop_assert_eq!(&parsed.value.matched_lines, &expected_lines);

        let completeness = parsed.value.completeness().unwrap();
        prop_assert!((0.0..=1.0).contains(&completeness));
    }

    #[test]
    fn prop_alignment_never_panics(raw in any::<String>()) {
        let parsed = parse_alignment(&raw);
        if parsed.provenance == Provenance::Failed {
            prop_assert!(parsed.value.labels.is_empty());
            prop_assert!(parsed.value.matched_lines.is_empty());
        }
    }
}
