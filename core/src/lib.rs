pub mod corpus;
pub mod index;
pub mod parser;
pub mod query;
pub mod query_file;
pub mod tags;
pub mod tokenizer;

pub use index::*;
pub use query::{run_query, Operand, Operator, Query, QueryError};
