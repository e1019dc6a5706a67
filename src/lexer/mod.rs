mod token;

pub use token::*;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::{iter::Peekable, str::Chars};
use unescape::unescape;

static KEYWORDS: Lazy<HashMap<&'static str, fn(Span) -> Token>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, fn(Span) -> Token> = HashMap::new();
    m.insert("fn", |position| Token::FnKeyword { position });
    m.insert("let", |position| Token::Let { position });
    m.insert("const", |position| Token::Const { position });
    m.insert("true", |position| Token::True { position });
    m.insert("false", |position| Token::False { position });
    m.insert("if", |position| Token::IfKeyword { position });
    m.insert("else", |position| Token::ElseKeyword { position });
    m.insert("return", |position| Token::ReturnKeyword { position });
    m.insert("while", |position| Token::WhileKeyword { position });
    m
});

/// Turns source text into a token stream. Lexing never fails: input the
/// lexer cannot match becomes an `Illegal` token for the parser to report.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iterator = input.chars().peekable();

        Self {
            tokens: vec![],
            iterator,
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.iterator.peek()
    }

    fn next(&mut self) -> Option<char> {
        let next = self.iterator.next();
        match next {
            Some('\n') => {
                self.line += 1;
                self.col = 1;
            }
            Some(_) => self.col += 1,
            None => {}
        }
        next
    }

    fn next_if(&mut self, func: impl FnOnce(&char) -> bool) -> Option<char> {
        if self.iterator.peek().copied().filter(|c| func(c)).is_some() {
            return self.next();
        }

        None
    }

    fn eat_whitespace(&mut self) {
        while self.next_if(|item| item.is_whitespace()).is_some() {}
    }

    /// The final token is always `Eof`, so the parser can keep asking for
    /// tokens past the end of input.
    pub fn lex(mut self) -> Vec<Token> {
        loop {
            self.eat_whitespace();

            let position = Span::new(self.line, self.col);

            let Some(next) = self.peek() else {
                self.tokens.push(Token::Eof { position });
                break;
            };

            match next {
                'a'..='z' | 'A'..='Z' | '_' => self.lex_alphanumeric(position),
                '0'..='9' => self.lex_numeric(position),
                '"' => self.lex_string(position),
                _ => self.lex_operator(position),
            };
        }

        self.tokens
    }

    fn lex_alphanumeric(&mut self, position: Span) {
        let mut stack = vec![];

        while let Some(next) = self.next_if(|item| item.is_ascii_alphanumeric() || *item == '_') {
            stack.push(next);
        }

        let read = stack.iter().collect::<String>();

        if let Some(keyword) = KEYWORDS.get(read.as_str()) {
            self.tokens.push(keyword(position));
        } else {
            self.tokens.push(Token::Id {
                value: read,
                position,
            })
        }
    }

    fn lex_numeric(&mut self, position: Span) {
        let mut stack = vec![];

        while let Some(next) = self.next_if(|item| item.is_ascii_digit()) {
            stack.push(next);
        }

        if self.next_if(|item| *item == '.').is_none() {
            self.tokens.push(Token::Integer {
                literal: stack.iter().collect(),
                position,
            });
            return;
        }

        stack.push('.');

        let mut fraction = false;
        while let Some(next) = self.next_if(|item| item.is_ascii_digit()) {
            stack.push(next);
            fraction = true;
        }

        let literal = stack.iter().collect::<String>();

        // `12.` has no digits after the dot and is not a float
        if fraction {
            self.tokens.push(Token::Float { literal, position });
        } else {
            self.tokens.push(Token::Illegal {
                value: literal,
                position,
            });
        }
    }

    fn lex_string(&mut self, position: Span) {
        self.next();

        let mut raw = vec![];
        let mut terminated = false;

        while let Some(next) = self.next() {
            match next {
                '"' => {
                    terminated = true;
                    break;
                }
                '\\' => {
                    raw.push('\\');
                    if let Some(escaped) = self.next() {
                        raw.push(escaped);
                    }
                }
                c => raw.push(c),
            }
        }

        let raw = raw.iter().collect::<String>();

        if !terminated {
            self.tokens.push(Token::Illegal {
                value: format!("\"{raw}"),
                position,
            });
            return;
        }

        match unescape(&raw) {
            Some(value) => self.tokens.push(Token::Str { value, position }),
            None => self.tokens.push(Token::Illegal {
                value: format!("\"{raw}\""),
                position,
            }),
        }
    }

    fn lex_operator(&mut self, position: Span) {
        let Some(next) = self.next() else {
            return;
        };

        let token = match next {
            '=' => match self.next_if(|item| *item == '=') {
                Some(_) => Token::Equal { position },
                None => Token::Assign { position },
            },
            '!' => match self.next_if(|item| *item == '=') {
                Some(_) => Token::NotEqual { position },
                None => Token::ExclamationMark { position },
            },
            '+' => Token::Plus { position },
            '-' => Token::Minus { position },
            '*' => Token::Times { position },
            '/' => Token::Slash { position },
            '%' => Token::Percent { position },
            '<' => Token::LessThan { position },
            '>' => Token::GreaterThan { position },
            ',' => Token::Comma { position },
            ';' => Token::Semicolon { position },
            ':' => Token::Colon { position },
            '(' => Token::LParen { position },
            ')' => Token::RParen { position },
            '{' => Token::LBrace { position },
            '}' => Token::RBrace { position },
            '[' => Token::LBracket { position },
            ']' => Token::RBracket { position },
            other => Token::Illegal {
                value: other.to_string(),
                position,
            },
        };

        self.tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .lex()
            .iter()
            .map(|token| token.kind())
            .collect()
    }

    #[test]
    fn test_lex_alphabetic_id() {
        let lexer = Lexer::new("letter");

        assert_eq!(
            vec![
                Token::Id {
                    value: "letter".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ],
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_numeric() {
        let lexer = Lexer::new("1337");

        assert_eq!(
            vec![
                Token::Integer {
                    literal: "1337".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ],
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_float() {
        let lexer = Lexer::new("13.37");

        assert_eq!(
            vec![
                Token::Float {
                    literal: "13.37".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ],
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_trailing_dot_is_illegal() {
        let lexer = Lexer::new("13.");

        assert_eq!(
            vec![
                Token::Illegal {
                    value: "13.".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ],
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_let() {
        let lexer = Lexer::new("let foo = 42;");

        assert_eq!(
            vec![
                Token::Let {
                    position: Span::default(),
                },
                Token::Id {
                    value: "foo".into(),
                    position: Span::default(),
                },
                Token::Assign {
                    position: Span::default(),
                },
                Token::Integer {
                    literal: "42".into(),
                    position: Span::default(),
                },
                Token::Semicolon {
                    position: Span::default(),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ],
            lexer.lex()
        );
    }

    #[test]
    fn test_lex_function() {
        assert_eq!(
            kinds("fn (x, y) { x + y }"),
            vec![
                TokenKind::FnKeyword,
                TokenKind::LParen,
                TokenKind::Id,
                TokenKind::Comma,
                TokenKind::Id,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Id,
                TokenKind::Plus,
                TokenKind::Id,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_two_char_operators_are_not_split() {
        assert_eq!(
            kinds("== != = !"),
            vec![
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::Assign,
                TokenKind::ExclamationMark,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_all_single_char_operators() {
        assert_eq!(
            kinds("+ - * / % < > , ; : ( ) { } [ ]"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Times,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::LessThan,
                TokenKind::GreaterThan,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_keywords() {
        assert_eq!(
            kinds("let const fn if else return while true false"),
            vec![
                TokenKind::Let,
                TokenKind::Const,
                TokenKind::FnKeyword,
                TokenKind::IfKeyword,
                TokenKind::ElseKeyword,
                TokenKind::ReturnKeyword,
                TokenKind::WhileKeyword,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_string() {
        let lexer = Lexer::new("\"hello world\"");

        assert_eq!(
            vec![
                Token::Str {
                    value: "hello world".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ],
            lexer.lex()
        );
    }

    #[test]
    fn test_lex_string_escapes() {
        let lexer = Lexer::new(r#""a\"b\\c\nd\te""#);

        assert_eq!(
            vec![
                Token::Str {
                    value: "a\"b\\c\nd\te".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ],
            lexer.lex()
        );
    }

    #[test]
    fn test_lex_unterminated_string_is_illegal() {
        let tokens = Lexer::new("\"oops").lex();

        assert_eq!(
            tokens,
            vec![
                Token::Illegal {
                    value: "\"oops".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ]
        );
    }

    #[test]
    fn test_lex_unknown_char_is_illegal() {
        let tokens = Lexer::new("@").lex();

        assert_eq!(
            tokens,
            vec![
                Token::Illegal {
                    value: "@".into(),
                    position: Span::new(1, 1),
                },
                Token::Eof {
                    position: Span::default(),
                },
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("let x = 5;\nx").lex();

        let positions = tokens
            .iter()
            .map(|token| {
                let Span { line, col } = token.position();
                (line, col)
            })
            .collect::<Vec<_>>();

        assert_eq!(
            positions,
            vec![(1, 1), (1, 5), (1, 7), (1, 9), (1, 10), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn test_empty_input_yields_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \n\t "), vec![TokenKind::Eof]);
    }
}
