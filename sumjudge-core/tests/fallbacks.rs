//! End-to-end decoding of judge responses as they show up in practice

use std::collections::BTreeSet;

use sumjudge::{
    parse_alignment, parse_fact_check, parse_key_facts, Aggregator, Provenance,
};

#[test]
fn fact_check_with_markdown_and_python_literals() {
    let raw = "Sure, here is the evaluation.\n\n```python\n[\n    {'sentence': 'The mayor opened the bridge.', \
               'reason': 'The transcript names the governor.', 'category': 'entity error'},\n    \
               {'sentence': 'It cost $3m.', 'reason': \"Matches the article's figure.\", 'category': 'no error'},\n]\n```";
    let parsed = parse_fact_check(raw);
    assert_eq!(parsed.provenance, Provenance::Exact);
    assert_eq!(parsed.value.labels, vec![1, 0]);
    assert_eq!(parsed.value.error_types, vec!["entity error", "no error"]);
}

#[test]
fn fact_check_single_object_answer() {
    let raw = "The summary has one sentence.\n{\"sentence\": \"Rain is expected.\", \
               \"reason\": \"Forecast says sun.\", \"category\": \"predicate error\"}";
    let parsed = parse_fact_check(raw);
    assert_eq!(parsed.provenance, Provenance::SingleRecord);
    assert_eq!(parsed.value.labels, vec![1]);
    assert_eq!(parsed.value.error_types, vec!["predicate error"]);
}

#[test]
fn fact_check_prose_answer_uses_keyword_scan() {
    let raw = "Sentence 1 - category: circumstantial error, the date is wrong.\n\
               Sentence 2 - category: no error.\n\
               Sentence 3 - category: coreference error since 'he' is unclear.";
    let parsed = parse_fact_check(raw);
    assert_eq!(parsed.provenance, Provenance::Heuristic);
    assert_eq!(parsed.value.labels, vec![1, 0, 1]);
    assert_eq!(
        parsed.value.error_types,
        vec!["circumstantial error", "no error", "coreference error"]
    );
}

#[test]
fn fact_check_truncated_array_uses_keyword_scan() {
    // Response cut off by the token limit
    let raw = r#"[{"sentence": "A.", "reason": "r", "category": "no error"},
{"sentence": "B.", "reason": "r", "category": "grammatical error"},
{"sentence": "C.", "reason": "r", "categ"#;
    let parsed = parse_fact_check(raw);
    assert_eq!(parsed.provenance, Provenance::Heuristic);
    assert_eq!(parsed.value.labels, vec![0, 1]);
}

#[test]
fn empty_response_is_empty_for_every_parser() {
    let fact_check = parse_fact_check("");
    assert_eq!(fact_check.provenance, Provenance::Failed);
    assert!(fact_check.value.labels.is_empty());
    assert!(fact_check.value.error_types.is_empty());

    let alignment = parse_alignment("");
    assert_eq!(alignment.provenance, Provenance::Failed);
    assert!(alignment.value.labels.is_empty());
    assert!(alignment.value.matched_lines.is_empty());

    assert!(parse_key_facts("").value.is_empty());
}

#[test]
fn alignment_line_cited_twice_counts_once() {
    let raw = r#"```
[
  {"key fact": "Ten people were hurt.", "response": "Yes", "line number": [2]},
  {"key fact": "The fire began at noon.", "response": "Yes", "line number": [2, 3]},
  {"key fact": "The owner was arrested.", "response": "No"}
]
```"#;
    let parsed = parse_alignment(raw);
    assert_eq!(parsed.provenance, Provenance::Exact);
    assert_eq!(parsed.value.labels, vec![1, 1, 0]);
    assert_eq!(parsed.value.matched_lines, BTreeSet::from([2, 3]));
    assert_eq!(parsed.value.conciseness(4), Some(0.5));
}

#[test]
fn alignment_ignores_brackets_inside_strings() {
    let raw = r#"[{"key fact": "Police said [the suspect] fled.", "response": "Yes", "line number": ["[1]"]}]
Explanation: see [1]."#;
    let parsed = parse_alignment(raw);
    assert_eq!(parsed.provenance, Provenance::Exact);
    assert_eq!(parsed.value.matched_lines, BTreeSet::from([1]));
}

#[test]
fn scores_flow_into_aggregator() {
    let mut agg = Aggregator::new();

    let good = parse_fact_check(
        r#"[{"sentence": "A.", "reason": "r", "category": "no error"},
            {"sentence": "B.", "reason": "r", "category": "no error"}]"#,
    );
    let bad = parse_fact_check("I'm sorry, I can't help with that.");
    let partial = parse_fact_check("category: entity error");

    assert_eq!(agg.record_fact_check("gpt-4", &good.value), Some(1.0));
    assert_eq!(agg.record_fact_check("gpt-4", &bad.value), None);
    assert_eq!(agg.record_fact_check("human", &partial.value), Some(0.0));

    assert_eq!(agg.attempted(), 3);
    assert_eq!(agg.succeeded(), 2);

    let summaries = agg.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].model, "gpt-4");
    assert_eq!(summaries[0].faithfulness, Some(1.0));
    assert_eq!(summaries[0].sentence_error_ratio, Some(0.0));
    assert_eq!(summaries[1].error_type_counts["entity error"], 1);
}

#[test]
fn key_facts_from_chatty_response() {
    let raw = "Here are the key facts:\n\n```json\n[\n  \"A storm hit the coast on Monday.\",\n  \"Two people died.\",\n  \"Power was cut to 10,000 homes.\"\n]\n```";
    let parsed = parse_key_facts(raw);
    assert_eq!(parsed.provenance, Provenance::Exact);
    assert_eq!(parsed.value.len(), 3);
    assert_eq!(parsed.value[1], "Two people died.");
}
