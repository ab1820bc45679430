use std::path::Path;

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use lingo::{Error, ParseError};

/// Renders errors and warnings to stderr, against their source when known.
pub struct Reporter {
    writer: StandardStream,
    config: term::Config,
}

impl Reporter {
    pub fn new(no_color: bool) -> Self {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Reporter {
            writer: StandardStream::stderr(color_choice),
            config: term::Config::default(),
        }
    }

    pub fn error(&self, error: &Error) {
        match error {
            Error::Parse { path, text, error } => {
                eprintln!("error: could not convert '{}'", path.display());
                self.emit(path, text.clone(), std::slice::from_ref(error));
            }
            other => eprintln!("error: {}", other),
        }
    }

    /// Show warnings for `path`. The document is re-read to show context;
    /// if that fails the bare messages are printed.
    pub fn warnings(&self, path: &Path, warnings: &[ParseError]) {
        if warnings.is_empty() {
            return;
        }
        match std::fs::read(path) {
            Ok(bytes) => self.emit(path, String::from_utf8_lossy(&bytes).into_owned(), warnings),
            Err(_) => {
                for warning in warnings {
                    eprintln!("warning: {}: {}", path.display(), warning);
                }
            }
        }
    }

    fn emit(&self, path: &Path, text: String, problems: &[ParseError]) {
        let mut files = SimpleFiles::new();
        let file_id = files.add(path.display().to_string(), text);
        for problem in problems {
            let diagnostic = problem.to_diagnostic(file_id);
            let rendered =
                term::emit_to_write_style(&mut self.writer.lock(), &self.config, &files, &diagnostic);
            // Lossy decoding can shift spans off a char boundary.
            if rendered.is_err() {
                eprintln!("{}: {}", path.display(), problem);
            }
        }
    }
}
