//! Recursive-descent parser.
//!
//! ```text
//! expr    := and ("or" and)*
//! and     := unary ("and" unary)*
//! unary   := "not" unary | compare
//! compare := postfix (("==" | "!=" | "<" | "<=" | ">" | ">=") postfix)?
//! postfix := primary ("|" builtin)*
//! primary := path | literal | "halt" | "(" expr ")"
//! builtin := "length" | "not" | name "(" expr ")"
//! ```
//!
//! Unlike jq, `|` binds tightest: `.a | length > 2 and .b` reads as
//! `((.a | length) > 2) and .b`.

use serde_json::Value;

use super::lexer::{tokenize, Token, TokenKind};
use crate::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Builtin {
    Length,
    Not,
    Contains(Box<Expr>),
    StartsWith(Box<Expr>),
    EndsWith(Box<Expr>),
    Test(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Path(Vec<String>),
    Literal(Value),
    Halt,
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Pipe(Box<Expr>, Builtin),
}

pub fn parse(src: &str) -> Result<Expr, FilterError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: src.len(),
    };
    let expr = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(FilterError::Parse {
            position: token.position,
            message: format!("unexpected {}", describe(&token.kind)),
        });
    }
    Ok(expr)
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Path(segments) if segments.is_empty() => "'.'".to_string(),
        TokenKind::Path(segments) => format!("path '.{}'", segments.join(".")),
        TokenKind::Str(s) => format!("string {s:?}"),
        TokenKind::Int(n) => format!("number {n}"),
        TokenKind::Float(n) => format!("number {n}"),
        TokenKind::Ident(name) => format!("'{name}'"),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Pipe => "'|'".to_string(),
        TokenKind::Eq => "'=='".to_string(),
        TokenKind::Ne => "'!='".to_string(),
        TokenKind::Lt => "'<'".to_string(),
        TokenKind::Le => "'<='".to_string(),
        TokenKind::Gt => "'>'".to_string(),
        TokenKind::Ge => "'>='".to_string(),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Ident(id), .. }) if id == name)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, message: impl Into<String>) -> FilterError {
        FilterError::Parse {
            position: self.peek().map(|t| t.position).unwrap_or(self.end),
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), FilterError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => {
                let found = describe(&token.kind);
                Err(self.error_here(format!("expected {what}, found {found}")))
            }
            None => Err(self.error_here(format!("expected {what}, found end of input"))),
        }
    }

    fn expr(&mut self) -> Result<Expr, FilterError> {
        let mut lhs = self.and()?;
        while self.peek_ident("or") {
            self.pos += 1;
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, FilterError> {
        let mut lhs = self.unary()?;
        while self.peek_ident("and") {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FilterError> {
        if self.peek_ident("not") {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.compare()
    }

    fn compare(&mut self) -> Result<Expr, FilterError> {
        let lhs = self.postfix()?;
        let op = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Ne) => CompareOp::Ne,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Le) => CompareOp::Le,
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Ge) => CompareOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.postfix()?;
        Ok(Expr::Compare(op, Box::new(lhs), Box::new(rhs)))
    }

    fn postfix(&mut self) -> Result<Expr, FilterError> {
        let mut expr = self.primary()?;
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Pipe)) {
            self.pos += 1;
            let builtin = self.builtin()?;
            expr = Expr::Pipe(Box::new(expr), builtin);
        }
        Ok(expr)
    }

    fn builtin(&mut self) -> Result<Builtin, FilterError> {
        let name = match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => name.clone(),
            _ => return Err(self.error_here("expected builtin after '|'")),
        };
        let name_pos = self.pos;
        self.pos += 1;

        match name.as_str() {
            "length" => Ok(Builtin::Length),
            "not" => Ok(Builtin::Not),
            "contains" => Ok(Builtin::Contains(self.argument()?)),
            "startswith" => Ok(Builtin::StartsWith(self.argument()?)),
            "endswith" => Ok(Builtin::EndsWith(self.argument()?)),
            "test" => Ok(Builtin::Test(self.argument()?)),
            other => {
                self.pos = name_pos;
                Err(self.error_here(format!("unknown builtin '{other}'")))
            }
        }
    }

    fn argument(&mut self) -> Result<Box<Expr>, FilterError> {
        self.expect(TokenKind::LParen, "'('")?;
        let arg = self.expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Box::new(arg))
    }

    fn primary(&mut self) -> Result<Expr, FilterError> {
        let Some(token) = self.next() else {
            return Err(self.error_here("unexpected end of input"));
        };
        match token.kind {
            TokenKind::Path(segments) => Ok(Expr::Path(segments)),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::String(s))),
            TokenKind::Int(n) => Ok(Expr::Literal(Value::from(n))),
            TokenKind::Float(n) => Ok(Expr::Literal(Value::from(n))),
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                "halt" => Ok(Expr::Halt),
                other => Err(FilterError::Parse {
                    position: token.position,
                    message: format!("unexpected '{other}'"),
                }),
            },
            other => Err(FilterError::Parse {
                position: token.position,
                message: format!("unexpected {}", describe(&other)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> Box<Expr> {
        Box::new(Expr::Path(p.split('.').map(String::from).collect()))
    }

    fn eq(p: &str, s: &str) -> Expr {
        Expr::Compare(
            CompareOp::Eq,
            path(p),
            Box::new(Expr::Literal(Value::String(s.into()))),
        )
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse(r#".a == "1" or .b == "2" and .c == "3""#).unwrap();
        assert_eq!(
            expr,
            Expr::Or(
                Box::new(eq("a", "1")),
                Box::new(Expr::And(Box::new(eq("b", "2")), Box::new(eq("c", "3"))))
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = parse(r#"(.a == "1" or .b == "2") and .c == "3""#).unwrap();
        assert_eq!(
            expr,
            Expr::And(
                Box::new(Expr::Or(Box::new(eq("a", "1")), Box::new(eq("b", "2")))),
                Box::new(eq("c", "3"))
            )
        );
    }

    #[test]
    fn test_pipe_binds_tightest() {
        let expr = parse(".meta.tags | length > 1").unwrap();
        assert_eq!(
            expr,
            Expr::Compare(
                CompareOp::Gt,
                Box::new(Expr::Pipe(path("meta.tags"), Builtin::Length)),
                Box::new(Expr::Literal(Value::from(1)))
            )
        );
    }

    #[test]
    fn test_not_and_halt() {
        assert_eq!(
            parse("not .unread").unwrap(),
            Expr::Not(path("unread"))
        );
        assert_eq!(
            parse(".unread or halt").unwrap(),
            Expr::Or(path("unread"), Box::new(Expr::Halt))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse(".a ==").unwrap_err(),
            FilterError::Parse {
                position: 5,
                message: "unexpected end of input".into()
            }
        );
        assert!(matches!(
            parse("(.a == 1"),
            Err(FilterError::Parse { position: 8, .. })
        ));
        assert!(matches!(
            parse(".a | frobnicate"),
            Err(FilterError::Parse { position: 5, .. })
        ));
        assert!(matches!(
            parse(".a .b"),
            Err(FilterError::Parse { position: 3, .. })
        ));
        assert!(matches!(parse("and"), Err(FilterError::Parse { position: 0, .. })));
    }
}
