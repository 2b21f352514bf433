// crates/complete_comment/src/lib.rs

//! Replaces the first `AI:` comment of a JavaScript file with a completion.
//!
//! [`run`] is the whole workflow: read, scan, ask the [`Completer`], splice,
//! write. Every failure comes back as a [`TransformError`]; deciding how to
//! report it and which exit status to use is left to the binary.

pub mod config;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use completion_client::{Completer, CompletionError};
use scan_annotations::{scan, Annotation, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Error reading file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Error parsing {}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Error writing file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file has no tagged comment; it was not written.
    NothingToDo,
    /// The first tagged comment was replaced.
    Updated { prompt: String, completion: String },
}

/// Returns `source` with the annotation's span replaced by `replacement`.
///
/// The annotation must come from scanning this same `source`.
pub fn splice(source: &str, annotation: &Annotation, replacement: &str) -> String {
    let mut output = String::with_capacity(source.len() + replacement.len());
    output.push_str(&source[..annotation.span_start]);
    output.push_str(replacement);
    output.push_str(&source[annotation.span_end..]);
    output
}

/// Processes the first `AI:` comment in `path`.
///
/// # Errors
///
/// * [`TransformError::Read`] – the file cannot be read as UTF-8 text.
/// * [`TransformError::Parse`] – the file is not valid JavaScript.
/// * [`TransformError::Completion`] – the completion service failed; the file is untouched.
/// * [`TransformError::Write`] – the new contents could not be written.
pub fn run(path: &Path, completer: &dyn Completer) -> Result<Outcome, TransformError> {
    let source = fs::read_to_string(path).map_err(|source| TransformError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let annotations = scan(&source).map_err(|source| TransformError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(annotation) = annotations.into_iter().next() else {
        log::info!("no tagged comment in {}", path.display());
        return Ok(Outcome::NothingToDo);
    };
    log::debug!(
        "prompt {:?} at bytes {}..{}",
        annotation.prompt,
        annotation.span_start,
        annotation.span_end
    );

    let completion = completer.complete(&annotation.prompt)?.trim().to_string();
    let updated = splice(&source, &annotation, &completion);

    // Plain overwrite, no temp file + rename.
    fs::write(path, updated).map_err(|source| TransformError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("rewrote {}", path.display());

    Ok(Outcome::Updated {
        prompt: annotation.prompt,
        completion,
    })
}
