//! Reader for topic files pairing an output name with a raw query.
//!
//! ```text
//! <top>
//! <num>10.2452/401-CS</num>
//! <query>pes AND kočka</query>
//! </top>
//! ```
//!
//! Like the document parser this looks at one trimmed line at a time and
//! matches the `num` / `query` markers by substring. The `num` check runs
//! first, so a query whose text contains `num` is read as a name line.

use crate::tags::strip_tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEntry {
    /// Last `/` segment of the `num` value; used as the result file name.
    pub name: String,
    pub query: String,
}

pub fn parse_query_lines<I, L>(lines: I) -> Vec<QueryEntry>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut name: Option<String> = None;
    for (lineno, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.contains("num") {
            let path = strip_tag("num", line);
            name = path.rsplit('/').next().map(str::to_string).filter(|n| !n.is_empty());
            if name.is_none() {
                tracing::warn!(line = lineno + 1, value = %path, "num line without a usable name");
            }
        } else if line.contains("query") {
            let query = strip_tag("query", line);
            match &name {
                Some(n) => entries.push(QueryEntry { name: n.clone(), query }),
                None => tracing::warn!(line = lineno + 1, %query, "query without a preceding num; skipped"),
            }
        }
    }
    entries
}
