// crates/scan_annotations/src/lib.rs

//! Finds `AI:` comments in JavaScript source.
//!
//! The scanner lexes the whole buffer with tree-sitter, walks every
//! `comment` token in document order and keeps the ones whose text starts
//! with the marker. Each hit records the byte range of the full comment
//! token, delimiters included, so that replacing that range removes the
//! comment entirely.

use std::ops::Range;

use ai_marker::{comment_body, prompt_from_comment};
use thiserror::Error;
use tree_sitter::{Node, Parser};

/// One tagged comment: its prompt and the span of the comment token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub prompt: String,
    pub span_start: usize,
    pub span_end: usize,
}

impl Annotation {
    /// The half-open byte range `[span_start, span_end)`.
    pub fn span(&self) -> Range<usize> {
        self.span_start..self.span_end
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JavaScript grammar could not be loaded: {0}")]
    Grammar(String),

    #[error("Parser produced no syntax tree")]
    NoTree,

    #[error("Syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

/// A raw comment token as reported by the lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceComment {
    /// Full token text, delimiters included.
    pub text: String,
    pub start_byte: usize,
    pub end_byte: usize,
}

/// Abstracts the lexer so the marker logic can be tested without tree-sitter.
pub trait CommentSource {
    /// Returns every comment in `source`, in document order.
    fn comments(&mut self, source: &str) -> Result<Vec<SourceComment>, ParseError>;
}

/// tree-sitter backed [`CommentSource`] for JavaScript (JSX included).
pub struct JavaScriptComments {
    parser: Parser,
}

impl JavaScriptComments {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|err| ParseError::Grammar(err.to_string()))?;
        Ok(Self { parser })
    }
}

impl CommentSource for JavaScriptComments {
    fn comments(&mut self, source: &str) -> Result<Vec<SourceComment>, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        if let Some(bad) = first_error(root) {
            let pos = bad.start_position();
            return Err(ParseError::Syntax {
                line: pos.row + 1,
                column: pos.column + 1,
            });
        }

        let mut comments = Vec::new();
        let mut cursor = root.walk();
        'walk: loop {
            let node = cursor.node();
            if node.kind() == "comment" {
                comments.push(SourceComment {
                    text: source[node.byte_range()].to_string(),
                    start_byte: node.start_byte(),
                    end_byte: node.end_byte(),
                });
            }
            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        // Extras are attached wherever the parser was when it met them; keep
        // the result in document order regardless.
        comments.sort_by_key(|c| c.start_byte);
        Ok(comments)
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    Some(node)
}

/// Scans `source` with any [`CommentSource`] and returns the tagged comments.
pub fn scan_with(
    source: &str,
    lexer: &mut impl CommentSource,
) -> Result<Vec<Annotation>, ParseError> {
    let annotations: Vec<Annotation> = lexer
        .comments(source)?
        .into_iter()
        .filter_map(|comment| {
            let prompt = prompt_from_comment(comment_body(&comment.text))?;
            Some(Annotation {
                prompt,
                span_start: comment.start_byte,
                span_end: comment.end_byte,
            })
        })
        .collect();

    log::debug!("found {} tagged comment(s)", annotations.len());
    Ok(annotations)
}

/// Parses `source` as JavaScript and returns its `AI:` comments in source order.
///
/// # Errors
///
/// Returns [`ParseError`] if the buffer does not match the JavaScript
/// grammar. Only grammar errors are caught: ECMAScript early errors such as
/// `const x;` or a duplicate `let` binding parse cleanly and are scanned.
pub fn scan(source: &str) -> Result<Vec<Annotation>, ParseError> {
    let mut lexer = JavaScriptComments::new()?;
    scan_with(source, &mut lexer)
}
