use logos::Logos;
use std::fmt;

use crate::ast::{CmpOp, Span};

/// Token type for condition expressions.
///
/// Namespaces, ids and field names are all `Token::Word`; the resolver
/// decides what a dotted path means. Ids may start with a digit
/// (`1st_visit`, `2h_sword`) as long as they contain a letter or `_`;
/// all-digit input is a `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Comparison operator.
    Op(CmpOp),
    /// Conjunction `&&`.
    And,
    /// Disjunction `||`. Lexed only so it can be reported clearly.
    Or,
    /// Path separator `.`.
    Dot,
    /// `has_item:` separator.
    Colon,
    /// Numeric literal, with its source text.
    Number(f64, String),
    /// Identifier.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Op(op) => write!(f, "{op}"),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Dot => write!(f, "."),
            Token::Colon => write!(f, ":"),
            Token::Number(_, s) => write!(f, "{s}"),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

/// Internal logos token, converted to an owned `Token` after lexing.
///
/// Two-character operators are separate tokens, so logos' longest match
/// always reads `>=` before `>`.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token(">=")]
    Ge,

    #[token("<=")]
    Le,

    #[token("==")]
    EqEq,

    #[token("!=")]
    Ne,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_\-]*")]
    #[regex(r"[0-9][0-9\-]*[A-Za-z_][A-Za-z0-9_\-]*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    /// Byte range of the offending input.
    pub span: Span,
    /// Human-readable description.
    pub message: String,
}

/// Lex a condition into `(Token, Span)` pairs.
///
/// Lexing continues past bad characters so every error is reported at once.
pub fn lex(source: &str) -> (Vec<(Token, Span)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(raw) => {
                let token = match raw {
                    RawToken::Ge => Token::Op(CmpOp::Ge),
                    RawToken::Le => Token::Op(CmpOp::Le),
                    RawToken::EqEq => Token::Op(CmpOp::Eq),
                    RawToken::Ne => Token::Op(CmpOp::Ne),
                    RawToken::Gt => Token::Op(CmpOp::Gt),
                    RawToken::Lt => Token::Op(CmpOp::Lt),
                    RawToken::And => Token::And,
                    RawToken::Or => Token::Or,
                    RawToken::Dot => Token::Dot,
                    RawToken::Colon => Token::Colon,
                    RawToken::Number => {
                        let raw = lexer.slice().to_string();
                        match raw.parse::<f64>() {
                            Ok(n) => Token::Number(n, raw),
                            Err(_) => {
                                errors.push(LexError {
                                    span: span.clone(),
                                    message: format!("invalid number literal: {raw}"),
                                });
                                continue;
                            }
                        }
                    }
                    RawToken::Word => Token::Word(lexer.slice().to_string()),
                };
                tokens.push((token, span));
            }
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span.clone()]),
                });
            }
        }
    }

    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn two_char_operators_win_over_one_char() {
        assert_eq!(
            tokens("a>=5"),
            vec![
                Token::Word("a".into()),
                Token::Op(CmpOp::Ge),
                Token::Number(5.0, "5".into()),
            ]
        );
        assert_eq!(tokens("a<=5")[1], Token::Op(CmpOp::Le));
        assert_eq!(tokens("a!=5")[1], Token::Op(CmpOp::Ne));
        assert_eq!(tokens("a>5")[1], Token::Op(CmpOp::Gt));
    }

    #[test]
    fn negative_numbers_after_operator() {
        let t = tokens("relationship.npc_boric>=-50");
        assert_eq!(t[3], Token::Op(CmpOp::Ge));
        assert_eq!(t[4], Token::Number(-50.0, "-50".into()));
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(tokens("a >= 5 && b==true"), tokens("a>=5&&b==true"));
    }

    #[test]
    fn disjunction_is_lexed() {
        assert!(tokens("a==1 || b==2").contains(&Token::Or));
    }

    #[test]
    fn has_item_form() {
        assert_eq!(
            tokens("has_item:rope==true"),
            vec![
                Token::Word("has_item".into()),
                Token::Colon,
                Token::Word("rope".into()),
                Token::Op(CmpOp::Eq),
                Token::Word("true".into()),
            ]
        );
    }

    #[test]
    fn digit_led_ids_are_words() {
        assert_eq!(
            tokens("world_flags.1st_visit==true"),
            vec![
                Token::Word("world_flags".into()),
                Token::Dot,
                Token::Word("1st_visit".into()),
                Token::Op(CmpOp::Eq),
                Token::Word("true".into()),
            ]
        );
        assert_eq!(tokens("has_item:2h_sword")[2], Token::Word("2h_sword".into()));
        assert_eq!(tokens("a>=12")[2], Token::Number(12.0, "12".into()));
    }

    #[test]
    fn single_equals_is_an_error() {
        let (_, errors) = lex("a = 5");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 2..3);
    }

    #[test]
    fn spans_are_byte_offsets() {
        let (tokens, _) = lex("quest.q1 == true");
        assert_eq!(tokens[0].1, 0..5);
        assert_eq!(tokens[3].1, 9..11);
    }
}
