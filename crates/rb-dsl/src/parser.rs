use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::ast::*;
use crate::error::{ConditionError, ConditionResult};
use crate::lexer::{Token, lex};

/// Build the condition parser.
///
/// ```text
/// expr    := clause ("&&" clause)*
/// clause  := path op literal
/// path    := "has_item" ":" segment | word ("." segment)*
/// segment := word | unsigned number
/// literal := "true" | "false" | number | word
/// ```
///
/// An all-digit segment arrives as a number token; its source text is used
/// as the id. `a.1.5` lexes `1.5` as one number and splits it back into two
/// segments.
fn condition_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let word = select! { Token::Word(w) => w }.labelled("identifier");

    let segment = select! {
        Token::Word(w) => vec![w],
        Token::Number(_, raw) if !raw.starts_with('-') => {
            raw.split('.').map(str::to_string).collect::<Vec<_>>()
        },
    }
    .labelled("identifier");

    let has_item = select! { Token::Word(ref w) if w.as_str() == "has_item" => () }
        .ignore_then(just(Token::Colon))
        .ignore_then(segment.clone())
        .map(|parts| Path::HasItem(parts.join(".")));

    let dotted = word
        .clone()
        .then(
            just(Token::Dot)
                .ignore_then(segment)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(head, rest)| {
            let mut segments = vec![head];
            segments.extend(rest.into_iter().flatten());
            Path::Dotted(segments)
        });

    let path = choice((has_item, dotted)).map_with(|path, e| {
        let span: SimpleSpan = e.span();
        (path, span.into_range())
    });

    let op = select! { Token::Op(op) => op }.labelled("comparison operator");

    let literal = select! {
        Token::Number(n, _) => Literal::Number(n),
        Token::Word(w) if w == "true" => Literal::Bool(true),
        Token::Word(w) if w == "false" => Literal::Bool(false),
        Token::Word(w) => Literal::Ident(w),
    }
    .labelled("value");

    let clause = path
        .then(op)
        .then(literal)
        .map_with(|(((path, path_span), op), literal), e| {
            let span: SimpleSpan = e.span();
            Clause {
                path,
                op,
                literal,
                span: span.into_range(),
                path_span,
            }
        });

    clause
        .separated_by(just(Token::And))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|clauses| Expr { clauses })
}

/// Parse a token stream into a condition. Only the first error is kept.
pub fn parse(tokens: &[(Token, Span)]) -> ConditionResult<Expr> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), SimpleSpan::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: SimpleSpan = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = condition_parser().parse(stream).into_output_errors();

    if let Some(expr) = output
        && errors.is_empty()
    {
        return Ok(expr);
    }

    Err(errors
        .into_iter()
        .next()
        .map(|e| ConditionError::Parse {
            span: e.span().into_range(),
            message: e.to_string(),
        })
        .unwrap_or_else(|| ConditionError::Parse {
            span: 0..len,
            message: "malformed condition".to_string(),
        }))
}

/// Lex and parse a condition string.
///
/// `||` is rejected up front with its own error rather than surfacing as a
/// generic "unexpected token".
pub fn parse_condition(source: &str) -> ConditionResult<Expr> {
    let (tokens, lex_errors) = lex(source);
    if let Some(err) = lex_errors.into_iter().next() {
        return Err(ConditionError::Lex {
            span: err.span,
            message: err.message,
        });
    }
    if let Some((_, span)) = tokens.iter().find(|(t, _)| *t == Token::Or) {
        return Err(ConditionError::Disjunction { span: span.clone() });
    }
    parse(&tokens)
}
