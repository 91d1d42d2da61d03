//! Line-oriented reader for tagged document collections.
//!
//! The input is a flat stream of lines such as
//!
//! ```text
//! <DOC>
//! <DOCID>LN-20020102001</DOCID>
//! <TITLE>
//! Headline words
//! </TITLE>
//! <TEXT>
//! Body text...
//! </TEXT>
//! </DOC>
//! ```
//!
//! Open and close field tags must sit alone on their (trimmed) line. The id
//! line is recognised by the substring `DOCID` anywhere in it, which is looser
//! than the field tag check; existing collections rely on that.

use crate::index::{DocId, InvertedIndex, UNSET_DOC_ID};
use crate::tags::{close_tag, open_tag, strip_tag};
use crate::tokenizer::tokenize_line;

const DOC_ID_TAG: &str = "DOCID";

/// Fields whose content is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Text,
    Heading,
}

impl Field {
    const ALL: [Field; 3] = [Field::Title, Field::Text, Field::Heading];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "TITLE",
            Field::Text => "TEXT",
            Field::Heading => "HEADING",
        }
    }

    fn opened_by(line: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|f| line == open_tag(f.name()))
    }

    fn closed_by(line: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|f| line == close_tag(f.name()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Outside,
    InField(Field),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub documents: usize,
    pub tokens: usize,
    /// Tokens filed under [`UNSET_DOC_ID`].
    pub unset_tokens: usize,
    /// Close tags without a matching open, or opens inside an open field.
    pub malformed_tags: usize,
}

pub struct DocumentParser<'a> {
    index: &'a mut InvertedIndex,
    doc_id: DocId,
    state: State,
    stats: ParseStats,
}

impl<'a> DocumentParser<'a> {
    pub fn new(index: &'a mut InvertedIndex) -> Self {
        Self { index, doc_id: UNSET_DOC_ID.to_string(), state: State::Outside, stats: ParseStats::default() }
    }

    pub fn state(&self) -> State { self.state }

    pub fn doc_id(&self) -> &str { &self.doc_id }

    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.trim();
        self.stats.lines += 1;

        if line.contains(DOC_ID_TAG) {
            self.doc_id = strip_tag(DOC_ID_TAG, line);
            self.stats.documents += 1;
        } else if let Some(field) = Field::opened_by(line) {
            if let State::InField(open) = self.state {
                self.stats.malformed_tags += 1;
                tracing::debug!(line = self.stats.lines, open = open.name(), new = field.name(), "field opened inside another field");
            }
            self.state = State::InField(field);
        } else if let Some(field) = Field::closed_by(line) {
            match self.state {
                State::InField(open) if open == field => {}
                State::InField(open) => {
                    self.stats.malformed_tags += 1;
                    tracing::debug!(line = self.stats.lines, open = open.name(), closed = field.name(), "mismatched close tag");
                }
                State::Outside => {
                    self.stats.malformed_tags += 1;
                    tracing::debug!(line = self.stats.lines, closed = field.name(), "close tag without open field");
                }
            }
            self.state = State::Outside;
        } else if let State::InField(_) = self.state {
            for token in tokenize_line(line) {
                self.index.insert(&token, &self.doc_id);
                self.stats.tokens += 1;
                if self.doc_id == UNSET_DOC_ID {
                    self.stats.unset_tokens += 1;
                }
            }
        }
    }

    pub fn finish(self) -> ParseStats {
        if let State::InField(open) = self.state {
            tracing::debug!(open = open.name(), "input ended inside a field");
        }
        if self.stats.unset_tokens > 0 {
            tracing::debug!(tokens = self.stats.unset_tokens, id = UNSET_DOC_ID, "content indexed before any DOCID");
        }
        self.stats
    }
}

/// Feed every line to a fresh parser over `index`.
pub fn index_lines<I, L>(index: &mut InvertedIndex, lines: I) -> ParseStats
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut parser = DocumentParser::new(index);
    for line in lines {
        parser.feed_line(line.as_ref());
    }
    parser.finish()
}
