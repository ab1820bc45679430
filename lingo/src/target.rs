use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// The language being extracted: which fences to select, how to name the
/// output, and how its line directives are spelled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    /// Fence language tag, compared exactly.
    pub tag: String,
    /// Output file extension, without the dot.
    pub extension: String,
    /// Line comment marker that starts each directive.
    #[serde(default = "default_comment")]
    pub comment: String,
}

fn default_comment() -> String {
    "//".to_string()
}

impl Default for Target {
    fn default() -> Self {
        Target::go()
    }
}

impl Target {
    pub fn new(tag: impl Into<String>, extension: impl Into<String>, comment: impl Into<String>) -> Self {
        Target {
            tag: tag.into(),
            extension: extension.into(),
            comment: comment.into(),
        }
    }

    /// Go, whose toolchain honours `//line file:N` directives.
    pub fn go() -> Self {
        Target::new("go", "go", "//")
    }

    pub fn rust() -> Self {
        Target::new("rust", "rs", "//")
    }

    /// Look up a built-in profile by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "go" => Some(Target::go()),
            "rust" | "rs" => Some(Target::rust()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.tag.is_empty() || self.tag.chars().any(char::is_whitespace) {
            return Err(Error::InvalidInput(format!(
                "target tag must be a single non-empty word, got {:?}",
                self.tag
            )));
        }
        if self.extension.is_empty()
            || self.extension.chars().any(char::is_whitespace)
            || self.extension.contains(['/', '\\'])
        {
            return Err(Error::InvalidInput(format!(
                "output extension must be a plain file extension, got {:?}",
                self.extension
            )));
        }
        if self.comment.is_empty() || self.comment.contains('\n') {
            return Err(Error::InvalidInput(format!(
                "comment marker must be non-empty and single-line, got {:?}",
                self.comment
            )));
        }
        Ok(())
    }

    /// The directive mapping the following output line to `line` of `name`.
    pub fn directive(&self, name: &str, line: usize) -> String {
        format!("{}line {}:{}\n", self.comment, name, line)
    }

    /// `x.md` becomes `x.md.<extension>`; the document's own extension stays.
    pub fn output_path(&self, document: &Path) -> PathBuf {
        let mut name = OsString::from(document.as_os_str());
        name.push(".");
        name.push(&self.extension);
        PathBuf::from(name)
    }
}
