//! Boolean queries over an [`InvertedIndex`].
//!
//! A query is `operand (operator operand)*` with operators `AND`, `OR` and
//! `AND NOT`. There is no precedence: `a OR b AND c` means `(a OR b) AND c`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::index::{DocId, InvertedIndex};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty query")]
    Empty,
    /// Token count is even, so some operator has no right-hand side.
    #[error("query has {0} tokens; expected operand (operator operand)*")]
    MissingOperand(usize),
    #[error("unknown operator {0:?}; expected AND, OR or AND NOT")]
    UnknownOperator(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    AndNot,
}

impl Operator {
    pub fn apply(self, left: &HashSet<DocId>, right: &HashSet<DocId>) -> HashSet<DocId> {
        match self {
            Operator::And => and(left, right),
            Operator::Or => or(left, right),
            Operator::AndNot => and_not(left, right),
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Operator::And),
            "OR" => Ok(Operator::Or),
            "AND NOT" => Ok(Operator::AndNot),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::AndNot => "AND NOT",
        })
    }
}

/// Either a term still to be looked up or an already computed result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Term(String),
    Result(HashSet<DocId>),
}

impl Operand {
    pub fn resolve(self, index: &InvertedIndex) -> HashSet<DocId> {
        match self {
            Operand::Term(term) => index.lookup(&term),
            Operand::Result(docs) => docs,
        }
    }
}

pub fn or(a: &HashSet<DocId>, b: &HashSet<DocId>) -> HashSet<DocId> {
    a.union(b).cloned().collect()
}

/// Intersection, probing the larger set with members of the smaller.
pub fn and(a: &HashSet<DocId>, b: &HashSet<DocId>) -> HashSet<DocId> {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|doc| large.contains(*doc)).cloned().collect()
}

/// Members of `a` missing from `b`.
pub fn and_not(a: &HashSet<DocId>, b: &HashSet<DocId>) -> HashSet<DocId> {
    a.difference(b).cloned().collect()
}

/// Split raw query text into operands and operators, joining `AND NOT`.
pub fn split_query(raw: &str) -> Vec<String> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        if words[i] == "AND" && words.get(i + 1) == Some(&"NOT") {
            tokens.push("AND NOT".to_string());
            i += 2;
        } else {
            tokens.push(words[i].to_string());
            i += 1;
        }
    }
    tokens
}

/// A validated query: the first operand followed by `(operator, operand)` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub first: Operand,
    pub rest: Vec<(Operator, Operand)>,
}

impl Query {
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, QueryError> {
        let (first, tail) = tokens.split_first().ok_or(QueryError::Empty)?;
        if tokens.len() % 2 == 0 {
            return Err(QueryError::MissingOperand(tokens.len()));
        }
        let rest = tail
            .chunks_exact(2)
            .map(|pair| -> Result<(Operator, Operand), QueryError> {
                let op = pair[0].as_ref().parse::<Operator>()?;
                Ok((op, Operand::Term(pair[1].as_ref().to_string())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Query { first: Operand::Term(first.as_ref().to_string()), rest })
    }

    /// Fold left to right over the operator/operand pairs.
    pub fn evaluate(self, index: &InvertedIndex) -> HashSet<DocId> {
        self.rest.into_iter().fold(self.first.resolve(index), |acc, (op, operand)| {
            let right = operand.resolve(index);
            op.apply(&acc, &right)
        })
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Query::parse(&split_query(raw))
    }
}

/// Parse and evaluate `raw` against `index`.
pub fn run_query(index: &InvertedIndex, raw: &str) -> Result<HashSet<DocId>, QueryError> {
    let query: Query = raw.parse()?;
    tracing::debug!(query = raw, steps = query.rest.len(), "evaluating query");
    Ok(query.evaluate(index))
}
