use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use thiserror::Error;

/// The pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexing,
    Parsing,
    Compilation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexing => write!(f, "Lexing"),
            Stage::Parsing => write!(f, "Parsing"),
            Stage::Compilation => write!(f, "Compilation"),
        }
    }
}

/// A single line-numbered diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub line: usize,
    /// The character that triggered the diagnostic, if any.
    pub lexeme: Option<char>,
    pub stage: Option<Stage>,
    pub message: String,
    /// Byte span in source, for codespan-reporting.
    pub span: Option<Range<usize>>,
}

impl ErrorInfo {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        ErrorInfo {
            line,
            lexeme: None,
            stage: None,
            message: message.into(),
            span: None,
        }
    }

    pub fn at(mut self, lexeme: char) -> Self {
        self.lexeme = Some(lexeme);
        self
    }

    pub fn in_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let labels = match &self.span {
            Some(span) => vec![Label::primary(file_id, span.clone())],
            None => Vec::new(),
        };
        let mut notes = vec![format!("line {}", self.line)];
        if let Some(stage) = self.stage {
            notes.push(format!("while {}", stage.to_string().to_lowercase()));
        }
        Diagnostic::new(Severity::Error)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(notes)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line={}] ", self.line)?;
        if let Some(stage) = self.stage {
            write!(f, "{} ", stage)?;
        }
        write!(f, "Error")?;
        if let Some(lexeme) = self.lexeme {
            write!(f, " at '{}'", lexeme)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ErrorInfo {}

/// An ordered collection of diagnostics. Empty means success.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBundle {
    errors: Vec<ErrorInfo>,
}

impl ErrorBundle {
    pub fn new() -> Self {
        ErrorBundle::default()
    }

    pub fn add(&mut self, error: ErrorInfo) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorInfo> {
        self.errors.iter()
    }

    /// Ok if nothing was collected, otherwise hand back the partial value with the bundle.
    pub fn into_result<T>(self, value: T) -> Result<T, Recovered<T>> {
        if self.has_errors() {
            Err(Recovered {
                partial: value,
                errors: self,
            })
        } else {
            Ok(value)
        }
    }
}

impl fmt::Display for ErrorBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorBundle {}

impl IntoIterator for ErrorBundle {
    type Item = ErrorInfo;
    type IntoIter = std::vec::IntoIter<ErrorInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorBundle {
    type Item = &'a ErrorInfo;
    type IntoIter = std::slice::Iter<'a, ErrorInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl FromIterator<ErrorInfo> for ErrorBundle {
    fn from_iter<I: IntoIterator<Item = ErrorInfo>>(iter: I) -> Self {
        ErrorBundle {
            errors: iter.into_iter().collect(),
        }
    }
}

/// A failed stage: whatever was recovered around the failures, plus the diagnostics.
#[derive(Debug, Clone)]
pub struct Recovered<T> {
    pub partial: T,
    pub errors: ErrorBundle,
}

/// Failure of the whole pipeline.
#[derive(Debug, Error)]
pub enum SlyError {
    #[error("{0}")]
    Diagnostics(ErrorBundle),
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

impl SlyError {
    /// The collected diagnostics, if this failure carries any.
    pub fn diagnostics(&self) -> Option<&ErrorBundle> {
        match self {
            SlyError::Diagnostics(bundle) => Some(bundle),
            SlyError::Io(_) => None,
        }
    }
}

impl<T> From<Recovered<T>> for SlyError {
    fn from(recovered: Recovered<T>) -> Self {
        SlyError::Diagnostics(recovered.errors)
    }
}
