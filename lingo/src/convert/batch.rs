use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::{Conversion, Converter};
use crate::error::Error;
use crate::parser::MarkdownParser;

/// List the documents directly inside `dir` whose extension is exactly
/// `extension`, sorted by file name. Subdirectories are not entered.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let list_error = |source: std::io::Error| Error::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut documents = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// Convert every document in `dir`, in name order. The first failure ends
/// the batch; documents converted before it keep their outputs.
pub fn convert_all<P: MarkdownParser>(
    converter: &Converter<P>,
    dir: &Path,
    extension: &str,
) -> Result<Vec<Conversion>, Error> {
    let documents = discover(dir, extension)?;
    log::info!(
        "{}: {} document(s) with extension .{}",
        dir.display(),
        documents.len(),
        extension
    );

    documents
        .iter()
        .map(|document| converter.convert(document))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn discovers_matching_files_only() {
        let dir = TempDir::new().unwrap();
        for name in ["b.md", "a.md", "c.markdown", "d.md.go", "README"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.md")).unwrap();
        fs::write(dir.path().join("nested.md").join("inner.md"), "").unwrap();

        let found = discover(dir.path(), "md").unwrap();
        assert_eq!(names(&found), vec!["a.md", "b.md"]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = discover(&dir.path().join("gone"), "md").unwrap_err();
        assert!(matches!(err, Error::ListDir { .. }));
    }

    #[test]
    fn converts_each_document_independently() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.md"), "```go\npackage one\n```\n").unwrap();
        fs::write(dir.path().join("two.md"), "```go\npackage two\n```\n").unwrap();
        fs::write(dir.path().join("prose.md"), "just words\n").unwrap();

        let converter = Converter::new(Target::go()).unwrap();
        let conversions = convert_all(&converter, dir.path(), "md").unwrap();
        assert_eq!(conversions.len(), 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("one.md.go")).unwrap(),
            "//line one.md:2\npackage one\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("two.md.go")).unwrap(),
            "//line two.md:2\npackage two\n"
        );
        assert!(!dir.path().join("prose.md.go").exists());
    }

    #[test]
    fn first_failure_stops_the_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), b"```go\n\xff\n```\n").unwrap();
        fs::write(dir.path().join("b.md"), "```go\npackage b\n```\n").unwrap();

        let converter = Converter::new(Target::go()).unwrap();
        let err = convert_all(&converter, dir.path(), "md").unwrap_err();
        assert!(err.to_string().contains("a.md"));
        assert!(!dir.path().join("b.md.go").exists());
    }
}
