use crate::ast::Span;

/// Why a condition could not be compiled.
///
/// At runtime every variant means the same thing: the condition is false.
/// The variants exist so the linter and the CLI can say why.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConditionError {
    /// A character no token starts with, such as a lone `=`.
    #[error("{message}")]
    Lex {
        /// The offending characters.
        span: Span,
        /// What the lexer expected.
        message: String,
    },

    /// A `||` anywhere in the condition.
    #[error("`||` is not supported; split the choice or use a flag instead")]
    Disjunction {
        /// The `||` token.
        span: Span,
    },

    /// Tokens that do not form `path op literal` clauses.
    #[error("{message}")]
    Parse {
        /// First unexpected token, or end of input.
        span: Span,
        /// Parser message naming what was expected.
        message: String,
    },

    /// The first path segment names no namespace.
    #[error("unknown namespace `{namespace}`")]
    UnknownNamespace {
        /// The path.
        span: Span,
        /// The segment as written.
        namespace: String,
    },

    /// The namespace is known but the rest of the path is not.
    #[error("unknown field `{field}` for `{namespace}`")]
    UnknownField {
        /// The path.
        span: Span,
        /// The namespace segment.
        namespace: String,
        /// Everything after it, joined with `.`.
        field: String,
    },
}

impl ConditionError {
    /// Byte range the error points at.
    pub fn span(&self) -> Span {
        match self {
            Self::Lex { span, .. }
            | Self::Disjunction { span }
            | Self::Parse { span, .. }
            | Self::UnknownNamespace { span, .. }
            | Self::UnknownField { span, .. } => span.clone(),
        }
    }
}

/// Result alias for condition compilation.
pub type ConditionResult<T> = Result<T, ConditionError>;
