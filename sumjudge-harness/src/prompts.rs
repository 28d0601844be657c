//! Judge prompt templates

const FACT_CHECKING_TEMPLATE: &str = r#"
You will receive a transcript followed by a corresponding summary. Your task is to assess the factuality of each summary sentence across nine categories:
* no error: the statement aligns explicitly with the content of the transcript and is factually consistent with it.
* out-of-context error: the statement contains information not present in the transcript.
* entity error: the primary arguments (or their attributes) of the predicate are wrong.
* predicate error: the predicate in the summary statement is inconsistent with the transcript.
* circumstantial error: the additional information (like location or time) specifying the circumstance around a predicate is wrong.
* grammatical error: the grammar of the sentence is so wrong that it becomes meaningless.
* coreference error: a pronoun or reference with wrong or non-existing antecedent.
* linking error: error in how multiple statements are linked together in the discourse (for example temporal ordering or causal link).
* other error: the statement contains any factuality error which is not defined here.

Instruction:
First, compare each summary sentence with the transcript.
Second, provide a single sentence explaining which factuality error the sentence has.
Third, answer the classified error category for each sentence in the summary.

Provide your answer in JSON format. The answer should be a list of dictionaries whose keys are "sentence", "reason", and "category":
[{"sentence": "first sentence", "reason": "your reason", "category": "no error"}, {"sentence": "second sentence", "reason": "your reason", "category": "out-of-context error"}]

Transcript:
{transcript}

Summary with {num_sentences} sentences:
{sentences}
"#;

const ALIGNMENT_TEMPLATE: &str = r#"
You will receive a summary and a set of key facts for the same transcript. Your task is to assess if each key fact is inferred from the summary.

Instruction:
First, compare each key fact with the summary.
Second, check if the key fact is inferred from the summary and then response "Yes" or "No" for each key fact. If "Yes", specify the line number(s) of the summary sentence(s) relevant to each key fact.

Provide your answer in JSON format. The answer should be a list of dictionaries whose keys are "key fact", "response", and "line number":
[{"key fact": "first key fact", "response": "Yes", "line number": [1]}, {"key fact": "second key fact", "response": "No", "line number": []}]

Summary:
{summary}

{num_key_facts} key facts:
{key_facts}
"#;

const KEY_FACT_TEMPLATE: &str = r#"
Given the following news article, extract 3–5 key facts that capture the most important information. Each fact should be a concise sentence. Return *only* the JSON list of strings, with no additional text, preamble, or notes.

Article:
{article}

Example output:
[
    "Fact 1.",
    "Fact 2.",
    "Fact 3."
]
"#;

/// Fact-checking prompt: transcript plus the summary, one sentence per line.
pub fn fact_checking_prompt(transcript: &str, sentences: &[String]) -> String {
    let num_sentences = sentences.len().to_string();
    let summary = sentences.join("\n");
    render(
        FACT_CHECKING_TEMPLATE,
        &[
            ("transcript", transcript),
            ("num_sentences", num_sentences.as_str()),
            ("sentences", summary.as_str()),
        ],
    )
}

/// Alignment prompt: the summary with `[k] ` line numbers, then the key facts.
pub fn alignment_prompt(key_facts: &[String], sentences: &[String]) -> String {
    let summary = sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| format!("[{}] {}", idx + 1, sentence))
        .collect::<Vec<_>>()
        .join("\n");

    let num_key_facts = key_facts.len().to_string();
    let facts = key_facts.join("\n");
    render(
        ALIGNMENT_TEMPLATE,
        &[
            ("summary", summary.as_str()),
            ("num_key_facts", num_key_facts.as_str()),
            ("key_facts", facts.as_str()),
        ],
    )
}

/// Key-fact extraction prompt over the first `max_chars` characters of the article.
pub fn key_fact_prompt(article: &str, max_chars: usize) -> String {
    let excerpt = match article.char_indices().nth(max_chars) {
        Some((end, _)) => &article[..end],
        None => article,
    };
    render(KEY_FACT_TEMPLATE, &[("article", excerpt)])
}

/// Single-pass `{name}` substitution. Substituted text is never rescanned,
/// and braces that do not name a variable are copied through.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars.iter().find_map(|(name, value)| {
            let after = tail.strip_prefix(name)?.strip_prefix('}')?;
            Some((*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
