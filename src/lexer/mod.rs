use lachs::Span;
use std::fmt;

#[lachs::token]
pub enum Token {
    #[terminal("fnc")]
    Function,
    #[terminal("let")]
    Let,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[terminal("if")]
    If,
    #[terminal("else")]
    Else,
    #[terminal("return")]
    Return,
    #[terminal("while")]
    While,
    #[literal("[a-zA-Z_][a-zA-Z_]*")]
    Ident,
    #[literal("[0-9]+")]
    Integer,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[terminal("==")]
    EqEq,
    #[terminal("!=")]
    NotEq,
    #[terminal("=")]
    Assign,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Asterisk,
    #[terminal("/")]
    Slash,
    #[terminal("!")]
    Bang,
    #[terminal("<")]
    Lt,
    #[terminal(">")]
    Gt,
    #[terminal("&")]
    Ampersand,
    #[terminal(",")]
    Comma,
    #[terminal(";")]
    Semicolon,
    #[terminal(":")]
    Colon,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("{")]
    LBrace,
    #[terminal("}")]
    RBrace,
    #[terminal("[")]
    LBracket,
    #[terminal("]")]
    RBracket,
}

/// The kind of a token, detached from its literal and position.
///
/// The parser dispatches and reports errors purely in terms of kinds; `Eof`
/// stands in for "past the end of the token stream".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Int,
    String,
    Assign,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Bang,
    Lt,
    Gt,
    Eq,
    NotEq,
    Ampersand,
    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
    While,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Ampersand => "&",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::While => "WHILE",
            TokenKind::Eof => "EOF",
        };
        write!(f, "{text}")
    }
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Function(_) => TokenKind::Function,
            Token::Let(_) => TokenKind::Let,
            Token::True(_) => TokenKind::True,
            Token::False(_) => TokenKind::False,
            Token::If(_) => TokenKind::If,
            Token::Else(_) => TokenKind::Else,
            Token::Return(_) => TokenKind::Return,
            Token::While(_) => TokenKind::While,
            Token::Ident(_) => TokenKind::Ident,
            Token::Integer(_) => TokenKind::Int,
            Token::StringLiteral(_) => TokenKind::String,
            Token::EqEq(_) => TokenKind::Eq,
            Token::NotEq(_) => TokenKind::NotEq,
            Token::Assign(_) => TokenKind::Assign,
            Token::Plus(_) => TokenKind::Plus,
            Token::Minus(_) => TokenKind::Minus,
            Token::Asterisk(_) => TokenKind::Asterisk,
            Token::Slash(_) => TokenKind::Slash,
            Token::Bang(_) => TokenKind::Bang,
            Token::Lt(_) => TokenKind::Lt,
            Token::Gt(_) => TokenKind::Gt,
            Token::Ampersand(_) => TokenKind::Ampersand,
            Token::Comma(_) => TokenKind::Comma,
            Token::Semicolon(_) => TokenKind::Semicolon,
            Token::Colon(_) => TokenKind::Colon,
            Token::LParen(_) => TokenKind::LParen,
            Token::RParen(_) => TokenKind::RParen,
            Token::LBrace(_) => TokenKind::LBrace,
            Token::RBrace(_) => TokenKind::RBrace,
            Token::LBracket(_) => TokenKind::LBracket,
            Token::RBracket(_) => TokenKind::RBracket,
        }
    }

    /// The literal text of the token as it appeared in the source.
    pub fn literal(&self) -> String {
        let text = match self {
            Token::Ident(inner) => return inner.value.clone(),
            Token::Integer(inner) => return inner.value.clone(),
            Token::StringLiteral(inner) => return inner.value.clone(),
            Token::Function(_) => "fnc",
            Token::Let(_) => "let",
            Token::True(_) => "true",
            Token::False(_) => "false",
            Token::If(_) => "if",
            Token::Else(_) => "else",
            Token::Return(_) => "return",
            Token::While(_) => "while",
            Token::EqEq(_) => "==",
            Token::NotEq(_) => "!=",
            Token::Assign(_) => "=",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Asterisk(_) => "*",
            Token::Slash(_) => "/",
            Token::Bang(_) => "!",
            Token::Lt(_) => "<",
            Token::Gt(_) => ">",
            Token::Ampersand(_) => "&",
            Token::Comma(_) => ",",
            Token::Semicolon(_) => ";",
            Token::Colon(_) => ":",
            Token::LParen(_) => "(",
            Token::RParen(_) => ")",
            Token::LBrace(_) => "{",
            Token::RBrace(_) => "}",
            Token::LBracket(_) => "[",
            Token::RBracket(_) => "]",
        };
        text.to_string()
    }

    pub fn pos(&self) -> Span {
        match self {
            Token::Function(inner) => inner.position.clone(),
            Token::Let(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::If(inner) => inner.position.clone(),
            Token::Else(inner) => inner.position.clone(),
            Token::Return(inner) => inner.position.clone(),
            Token::While(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Integer(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::EqEq(inner) => inner.position.clone(),
            Token::NotEq(inner) => inner.position.clone(),
            Token::Assign(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Asterisk(inner) => inner.position.clone(),
            Token::Slash(inner) => inner.position.clone(),
            Token::Bang(inner) => inner.position.clone(),
            Token::Lt(inner) => inner.position.clone(),
            Token::Gt(inner) => inner.position.clone(),
            Token::Ampersand(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::Semicolon(inner) => inner.position.clone(),
            Token::Colon(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBrace(inner) => inner.position.clone(),
            Token::RBrace(inner) => inner.position.clone(),
            Token::RBracket(inner) => inner.position.clone(),
            Token::LBracket(inner) => inner.position.clone(),
        }
    }
}
