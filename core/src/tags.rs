/// `"TEXT"` -> `"<TEXT>"`
pub fn open_tag(name: &str) -> String {
    format!("<{name}>")
}

/// `"TEXT"` -> `"</TEXT>"`
pub fn close_tag(name: &str) -> String {
    format!("</{name}>")
}

/// Cut the `<name>` / `</name>` wrapper off a single-line element.
///
/// Works by length only: the first `len("<name>")` and last `len("</name>")`
/// characters are dropped without checking what they are. Lines shorter than
/// both tags together yield an empty string.
pub fn strip_tag(name: &str, line: &str) -> String {
    let head = open_tag(name).chars().count();
    let tail = close_tag(name).chars().count();
    let len = line.chars().count();
    if len <= head + tail {
        return String::new();
    }
    line.chars().skip(head).take(len - head - tail).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tags() {
        assert_eq!(open_tag("TITLE"), "<TITLE>");
        assert_eq!(close_tag("TITLE"), "</TITLE>");
    }

    #[test]
    fn strips_wrapper() {
        assert_eq!(strip_tag("DOCID", "<DOCID>LN-20020102001</DOCID>"), "LN-20020102001");
        assert_eq!(strip_tag("query", "<query>pes AND kočka</query>"), "pes AND kočka");
    }

    #[test]
    fn short_lines_do_not_panic() {
        assert_eq!(strip_tag("DOCID", "DOCID"), "");
        assert_eq!(strip_tag("DOCID", "<DOCID></DOCID>"), "");
        assert_eq!(strip_tag("num", ""), "");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(strip_tag("X", "<X>čř</X>"), "čř");
    }
}
