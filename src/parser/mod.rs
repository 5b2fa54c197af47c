//! PEST-based parser for range declarations
//!
//! Turns text such as `i = 0 .. 6 by 2, j = 4 ..= 0` into `Range<f64>`
//! values for a `Nest`. `..` is exclusive, `..=` is inclusive.

use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::range::{Bound, Range};


/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "parser/range.pest"]
struct RangeParser;

/* ===================== Declarations ===================== */

/// Source location, 0-indexed lines and columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

/// One parsed range declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeDecl {
    pub name: String,
    pub from: f64,
    pub to: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    pub inclusive: bool,
    #[serde(default)]
    pub span: Span,
}

impl RangeDecl {
    pub fn to_range(&self) -> Range<f64> {
        Range {
            name: self.name.clone(),
            from: self.from,
            to: self.to,
            step: self.step,
            bound: if self.inclusive {
                Bound::Inclusive
            } else {
                Bound::Exclusive
            },
        }
    }
}

/* ===================== Error Types ===================== */

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    PestError(String, Option<Span>),

    #[error("{0}")]
    BuildError(String, Option<Span>),
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::PestError(_, span) => *span,
            ParseError::BuildError(_, span) => *span,
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let (line, col) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        let (start, end) = match err.location {
            pest::error::InputLocation::Pos(pos) => (pos, pos),
            pest::error::InputLocation::Span(span) => span,
        };
        let span = Span {
            start,
            end,
            line: line.saturating_sub(1),
            col: col.saturating_sub(1),
        };
        ParseError::PestError(err.to_string(), Some(span))
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/* ===================== Span Helpers ===================== */

/// Convert a PEST pair's span to our Span type
fn pair_to_span(pair: &pest::iterators::Pair<Rule>) -> Span {
    let pest_span = pair.as_span();
    let (line, col) = pest_span.start_pos().line_col();
    Span {
        start: pest_span.start(),
        end: pest_span.end(),
        line: line - 1,
        col: col - 1,
    }
}

/* ===================== Building ===================== */

/// Parse a comma-separated list of range declarations
pub fn parse_ranges(source: &str) -> ParseResult<Vec<RangeDecl>> {
    let mut pairs = RangeParser::parse(Rule::decls, source)?;
    let decls = pairs
        .next()
        .ok_or_else(|| ParseError::BuildError("empty parse tree".into(), None))?;

    decls
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::decl)
        .map(build_decl)
        .collect()
}

fn build_decl(pair: pest::iterators::Pair<Rule>) -> ParseResult<RangeDecl> {
    let span = pair_to_span(&pair);
    let mut inner = pair.into_inner();

    let mut next = |what: &str| {
        inner
            .next()
            .ok_or_else(|| ParseError::BuildError(format!("missing {}", what), Some(span)))
    };

    let name = next("name")?.as_str().to_string();
    let from = build_number(next("lower bound")?)?;
    let inclusive = next("range operator")?.as_rule() == Rule::inclusive;
    let to = build_number(next("upper bound")?)?;
    let step = match inner.next() {
        Some(step) => {
            let number = step.into_inner().next().ok_or_else(|| {
                ParseError::BuildError("missing step value".into(), Some(span))
            })?;
            Some(build_number(number)?)
        }
        None => None,
    };

    Ok(RangeDecl {
        name,
        from,
        to,
        step,
        inclusive,
        span,
    })
}

fn build_number(pair: pest::iterators::Pair<Rule>) -> ParseResult<f64> {
    pair.as_str().parse::<f64>().map_err(|err| {
        ParseError::BuildError(
            format!("invalid number '{}': {}", pair.as_str(), err),
            Some(pair_to_span(&pair)),
        )
    })
}
