use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::index::{DocId, InvertedIndex};
use crate::parser::{index_lines, ParseStats};

/// Regular files directly inside `dir`, sorted by name. Subdirectories are not entered.
pub fn collect_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("listing {}", dir.as_ref().display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(f);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line.with_context(|| format!("reading {}", path.display()))?);
    }
    Ok(lines)
}

/// Parse one document file into its own shard.
pub fn index_file<P: AsRef<Path>>(path: P) -> Result<(InvertedIndex, ParseStats)> {
    let lines = read_lines(&path)?;
    let mut shard = InvertedIndex::new();
    let stats = index_lines(&mut shard, &lines);
    Ok((shard, stats))
}

/// Index every file in `dir`, one shard per file, merged into a single index.
pub fn index_directory<P: AsRef<Path>>(dir: P) -> Result<InvertedIndex> {
    let files = collect_files(&dir)?;
    let mut index = InvertedIndex::new();
    let mut documents = 0;
    let mut malformed = 0;
    for file in &files {
        let (shard, stats) = index_file(file)?;
        tracing::debug!(file = %file.display(), documents = stats.documents, tokens = stats.tokens, "indexed file");
        documents += stats.documents;
        malformed += stats.malformed_tags;
        index.merge(shard);
    }
    if malformed > 0 {
        tracing::warn!(malformed, "tolerated malformed field tags");
    }
    tracing::info!(files = files.len(), documents, num_terms = index.num_terms(), "built inverted index");
    Ok(index)
}

/// Write the ids as one file named `name` under `dir`, one id per line.
///
/// Ids are sorted so repeated runs produce identical files.
pub fn write_result<P: AsRef<Path>>(dir: P, name: &str, ids: &HashSet<DocId>) -> Result<PathBuf> {
    fs::create_dir_all(dir.as_ref())?;
    let path = dir.as_ref().join(name);
    let mut sorted: Vec<&DocId> = ids.iter().collect();
    sorted.sort();
    let mut f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    for id in sorted {
        writeln!(f, "{id}")?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn indexes_top_level_files_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.xml"), "<DOCID>A</DOCID>\n<TEXT>\nrust code\n</TEXT>\n").unwrap();
        fs::write(dir.path().join("b.xml"), "<DOCID>B</DOCID>\r\n<TITLE>\r\nrust\r\n</TITLE>\r\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.xml"), "<DOCID>C</DOCID>\n<TEXT>\nrust\n</TEXT>\n").unwrap();

        let files = collect_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.xml"));

        let index = index_directory(dir.path()).unwrap();
        let rust: HashSet<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(index.lookup("rust"), rust);
        assert_eq!(index.num_docs(), 2);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(index_directory(dir.path().join("nope")).is_err());
    }

    #[test]
    fn writes_sorted_ids() {
        let dir = tempdir().unwrap();
        let ids: HashSet<String> = ["d2", "d1", "d3"].iter().map(|s| s.to_string()).collect();
        let path = write_result(dir.path().join("out"), "401-CS", &ids).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "d1\nd2\nd3\n");

        let path = write_result(dir.path().join("out"), "empty", &HashSet::new()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }
}
