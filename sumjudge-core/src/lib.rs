//! sumjudge - tolerant decoding of LLM judge output
//!
//! Turns the free-text answers of a fact-checking or key-fact alignment
//! judge into labels, and labels into faithfulness, completeness and
//! conciseness scores. Decoding never fails outright: every result carries
//! a [`Provenance`] saying which tier produced it.
//!
//! # Example
//!
//! ```rust
//! use sumjudge::{parse_fact_check, Aggregator, Provenance};
//!
//! let raw = r#"[{"sentence": "A.", "reason": "ok", "category": "no error"},
//!              {"sentence": "B.", "reason": "wrong name", "category": "entity error"}]"#;
//! let parsed = parse_fact_check(raw);
//! assert_eq!(parsed.provenance, Provenance::Exact);
//! assert_eq!(parsed.value.labels, vec![0, 1]);
//!
//! let mut agg = Aggregator::new();
//! assert_eq!(agg.record_fact_check("human", &parsed.value), Some(0.5));
//! ```

mod types;
mod lexer;
mod parser;
mod literal;
mod extract;
mod fact_check;
mod alignment;
mod keyfacts;
mod score;
mod aggregate;

pub use types::{
    all_categories, AlignmentResult, Error, FactCheckResult, Parsed, Provenance, Result,
    ERROR_TYPES, NO_ERROR,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use literal::Literal;
pub use extract::{balanced_span, first_brace_span, first_bracket_span, strip_code_fences};
pub use fact_check::{parse_fact_check, sanitize_category};
pub use alignment::{coerce_line_number, parse_alignment};
pub use keyfacts::parse_key_facts;
pub use score::{completeness_score, conciseness_score, faithfulness_score};
pub use aggregate::{AlignmentScores, Aggregator, ModelAggregate, ModelSummary};
