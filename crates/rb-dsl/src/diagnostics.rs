//! Findings against a single content fragment.
//!
//! Conditions and action strings are short one-line fragments pulled out of
//! a larger JSON document. A [`Diagnostic`] points at a byte range inside
//! one fragment, and [`render_fragment`] draws it with the fragment's
//! origin (e.g. `dialogues.boric_main.nodes.0.choices[1].action`) standing
//! in for a file name.

use std::fmt;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::action::ActionParseError;
use crate::error::ConditionError;

/// How seriously the engine takes a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The fragment cannot do what its author meant: an unparseable
    /// condition never holds and an unknown verb is skipped. Fails `lint`.
    Error,
    /// The runtime copes, as with a dangling id or ignored extra
    /// parameters, but the author probably did not intend it.
    Warning,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn report_kind(self) -> ReportKind<'static> {
        match self {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        }
    }

    fn color(self) -> Color {
        match self {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        }
    }
}

/// One finding inside a condition or action fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Byte range in the fragment. Empty for findings about the document
    /// structure rather than a fragment.
    pub span: Range<usize>,
    /// Headline, e.g. ``unknown verb `hire_jb` ``.
    pub message: String,
    /// Hint drawn under the span; the headline is reused when absent.
    pub label: Option<String>,
}

impl Diagnostic {
    /// A finding that fails `lint`.
    pub fn error(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, span, message.into())
    }

    /// A finding `lint` reports but tolerates.
    pub fn warning(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, span, message.into())
    }

    fn new(severity: Severity, span: Range<usize>, message: String) -> Self {
        Self {
            severity,
            span,
            message,
            label: None,
        }
    }

    /// Attach the hint drawn under the span.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether this finding fails `lint`.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.as_str(), self.message)
    }
}

impl From<&ConditionError> for Diagnostic {
    fn from(err: &ConditionError) -> Self {
        let diag = Diagnostic::error(err.span(), err.to_string());
        match err {
            ConditionError::Disjunction { .. } => diag.with_label("only `&&` may join clauses"),
            ConditionError::UnknownNamespace { .. } => diag.with_label(format!(
                "expected one of: has_item:, {}",
                crate::resolver::namespace_names()
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            _ => diag,
        }
    }
}

impl From<&ActionParseError> for Diagnostic {
    fn from(err: &ActionParseError) -> Self {
        match err {
            ActionParseError::Empty { span } => {
                Diagnostic::warning(span.clone(), err.to_string()).with_label("stray `|`")
            }
            ActionParseError::UnknownVerb {
                span, suggestion, ..
            } => {
                let diag = Diagnostic::error(span.clone(), err.to_string());
                match suggestion {
                    Some(name) => diag.with_label(format!("did you mean `{name}`?")),
                    None => diag,
                }
            }
            ActionParseError::Arity { span, .. } => Diagnostic::error(span.clone(), err.to_string()),
        }
    }
}

/// Draw `diagnostics` against `fragment` for a terminal, one report each.
///
/// `origin` names where the fragment came from and heads every report.
/// Spans past the end of the fragment are clamped to it.
pub fn render_fragment(origin: &str, fragment: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let end = diag.span.end.min(fragment.len());
        let span = (origin, diag.span.start.min(end)..end);
        let label = diag.label.as_deref().unwrap_or(&diag.message);

        Report::build(diag.severity.report_kind(), span.clone())
            .with_message(&diag.message)
            .with_label(
                Label::new(span)
                    .with_message(label)
                    .with_color(diag.severity.color()),
            )
            .finish()
            .write((origin, Source::from(fragment)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(0..5, "unknown namespace `weather`");
        assert_eq!(d.to_string(), "error: unknown namespace `weather`");
    }

    #[test]
    fn render_names_the_origin() {
        let source = "quest.q1==true || world_flags.a==true";
        let diags = vec![
            Diagnostic::error(15..17, "`||` is not supported").with_label("only `&&` may join clauses"),
        ];
        let output = render_fragment("npcs.boric.quest_dialogues[0].condition", source, &diags);
        assert!(output.contains("`||` is not supported"));
        assert!(output.contains("npcs.boric.quest_dialogues[0].condition"));
    }

    #[test]
    fn span_past_the_fragment_is_clamped() {
        let diags = vec![Diagnostic::error(10..40, "unexpected end of input")];
        let output = render_fragment("<condition>", "quest.q1==", &diags);
        assert!(output.contains("unexpected end of input"));
    }

    #[test]
    fn unknown_verb_label_carries_suggestion() {
        let err = ActionParseError::UnknownVerb {
            verb: "grant_iten".into(),
            span: 0..10,
            suggestion: Some("grant_item"),
        };
        let diag = Diagnostic::from(&err);
        assert!(diag.is_error());
        assert_eq!(diag.label.as_deref(), Some("did you mean `grant_item`?"));
    }

    #[test]
    fn empty_segment_is_only_a_warning() {
        let diag = Diagnostic::from(&ActionParseError::Empty { span: 3..3 });
        assert_eq!(diag.severity, Severity::Warning);
    }
}
