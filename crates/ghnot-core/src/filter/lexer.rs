use crate::error::FilterError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `.`, `.a`, `.a.b` (segments without the dots)
    Path(Vec<String>),
    Str(String),
    Int(i64),
    Float(f64),
    Ident(String),
    LParen,
    RParen,
    Pipe,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_error(position: usize, message: impl Into<String>) -> FilterError {
    FilterError::Parse {
        position,
        message: message.into(),
    }
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, FilterError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let take_ident = |start: usize| -> (String, usize) {
        let mut end = start;
        while end < chars.len() && is_ident_char(chars[end].1) {
            end += 1;
        }
        (chars[start..end].iter().map(|(_, c)| c).collect(), end)
    };

    while i < chars.len() {
        let (position, c) = chars[i];
        let kind = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '.' => {
                let mut segments = Vec::new();
                i += 1;
                while i < chars.len() && is_ident_start(chars[i].1) {
                    let (segment, end) = take_ident(i);
                    segments.push(segment);
                    i = end;
                    if i + 1 < chars.len() && chars[i].1 == '.' && is_ident_start(chars[i + 1].1) {
                        i += 1;
                    } else {
                        break;
                    }
                }
                if i < chars.len() && chars[i].1 == '.' {
                    return Err(parse_error(chars[i].0, "expected field name after '.'"));
                }
                tokens.push(Token {
                    kind: TokenKind::Path(segments),
                    position,
                });
                continue;
            }
            '"' => {
                let mut value = String::new();
                i += 1;
                loop {
                    let Some(&(_, c)) = chars.get(i) else {
                        return Err(parse_error(position, "unterminated string"));
                    };
                    i += 1;
                    match c {
                        '"' => break,
                        '\\' => {
                            let Some(&(esc_pos, esc)) = chars.get(i) else {
                                return Err(parse_error(position, "unterminated string"));
                            };
                            i += 1;
                            value.push(match esc {
                                '"' => '"',
                                '\\' => '\\',
                                'n' => '\n',
                                't' => '\t',
                                other => {
                                    return Err(parse_error(
                                        esc_pos,
                                        format!("unknown escape '\\{other}'"),
                                    ))
                                }
                            });
                        }
                        other => value.push(other),
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Str(value),
                    position,
                });
                continue;
            }
            c if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(|(_, d)| d.is_ascii_digit())) => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().map(|(_, c)| c).collect();
                let kind = if text.contains('.') {
                    text.parse::<f64>()
                        .map(TokenKind::Float)
                        .map_err(|_| parse_error(position, format!("invalid number {text:?}")))?
                } else {
                    text.parse::<i64>()
                        .map(TokenKind::Int)
                        .map_err(|_| parse_error(position, format!("invalid number {text:?}")))?
                };
                tokens.push(Token { kind, position });
                continue;
            }
            c if is_ident_start(c) => {
                let (ident, end) = take_ident(i);
                i = end;
                tokens.push(Token {
                    kind: TokenKind::Ident(ident),
                    position,
                });
                continue;
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Pipe,
            '=' | '!' | '<' | '>' => {
                let next_is_eq = chars.get(i + 1).map(|(_, c)| *c) == Some('=');
                let kind = match (c, next_is_eq) {
                    ('=', true) => TokenKind::Eq,
                    ('!', true) => TokenKind::Ne,
                    ('<', true) => TokenKind::Le,
                    ('>', true) => TokenKind::Ge,
                    ('<', false) => TokenKind::Lt,
                    ('>', false) => TokenKind::Gt,
                    _ => return Err(parse_error(position, format!("unexpected '{c}'"))),
                };
                i += if next_is_eq { 2 } else { 1 };
                tokens.push(Token { kind, position });
                continue;
            }
            other => return Err(parse_error(position, format!("unexpected '{other}'"))),
        };
        tokens.push(Token { kind, position });
        i += 1;
    }

    Ok(tokens)
}
