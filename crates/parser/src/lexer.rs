/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use logos::{Logos, Span};

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\f]+")] // skip spaces/tabs/form feed but not newlines
pub enum Token {
    #[regex(r"\r?\n")]
    Newline,

    Indent,
    Dedent,

    // Keywords
    #[token("def")] Def,
    #[token("class")] Class,
    #[token("if")] If,
    #[token("else")] Else,
    #[token("elif")] Elif,
    #[token("for")] For,
    #[token("while")] While,
    #[token("break")] Break,
    #[token("continue")] Continue,
    #[token("return")] Return,
    #[token("import")] Import,
    #[token("from")] From,
    #[token("pass")] Pass,
    #[token("raise")] Raise,
    #[token("try")] Try,
    #[token("with")] With,
    #[token("lambda")] Lambda,
    #[token("yield")] Yield,
    #[token("global")] Global,
    #[token("nonlocal")] Nonlocal,
    #[token("assert")] Assert,
    #[token("del")] Del,
    #[token("True")] True,
    #[token("False")] False,
    #[token("None")] None_,

    // Augmented assignment
    #[token("+=")] PlusAssign,
    #[token("-=")] MinusAssign,
    #[token("*=")] StarAssign,
    #[token("/=")] SlashAssign,
    #[token("//=")] FloorDivAssign,
    #[token("%=")] PercentAssign,
    #[token("**=")] PowAssign,
    #[token("<<=")] ShiftLeftAssign,
    #[token(">>=")] ShiftRightAssign,
    #[token("&=")] AmpAssign,
    #[token("|=")] PipeAssign,
    #[token("^=")] CaretAssign,

    // Multi-char operators
    #[token("**")] Pow,
    #[token("//")] FloorDiv,
    #[token("<<")] ShiftLeft,
    #[token(">>")] ShiftRight,
    #[token("==")] Eq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("->")] Arrow,

    // Single-char operators
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("@")] At,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("<")] Lt,
    #[token(">")] Gt,
    #[token("=")] Assign,
    #[token(":")] Colon,
    #[token(".")] Dot,
    #[token(",")] Comma,
    #[token(";")] Semicolon,
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBracket,
    #[token("]")] RBracket,
    #[token("{")] LBrace,
    #[token("}")] RBrace,

    // Literals and identifiers
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    // Single- and double-quoted strings on one line
    #[regex(r#"'([^'\\\n]|\\.)*'|"([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"#[^\n]*")]
    Comment,

    /// Synthetic end of input, emitted once by [`IndentLexer`]
    Eof,

    /// Anything Logos could not match, or an inconsistent dedent
    Error,
}

impl Token {
    /// Statement keywords that lex fine but have no place in a compiled function.
    pub fn is_unsupported_keyword(&self) -> bool {
        matches!(
            self,
            Token::Class
                | Token::Import
                | Token::From
                | Token::Raise
                | Token::Try
                | Token::With
                | Token::Lambda
                | Token::Yield
                | Token::Global
                | Token::Nonlocal
                | Token::Assert
                | Token::Del
        )
    }
}

pub type SpannedToken = (Token, Span);

/// Wraps the Logos lexer and emits 'Indent' / 'Dedent' tokens based on
/// leading whitespace after each newline, following Python's indentation rules.
pub struct IndentLexer<'src> {
    source: &'src str,
    /// Pre-collected raw tokens from Logos (with spans)
    raw: Vec<SpannedToken>,
    /// Current position inside `raw`.
    pos: usize,
    /// Stack of indentation column widths; always starts with `[0]`
    indent_stack: Vec<usize>,
    /// Pending synthetic tokens to emit before continuing with `raw`
    pending: Vec<SpannedToken>,
    finished: bool,
    /// Indentation is ignored inside `()`, `[]`, `{}`
    bracket_depth: usize,
}

impl<'src> IndentLexer<'src> {
    pub fn new(source: &'src str) -> Self {
        let raw = Token::lexer(source)
            .spanned()
            .map(|(token, span)| match token {
                Ok(token) => (token, span),
                Err(_) => (Token::Error, span),
            })
            .collect();

        Self {
            source,
            raw,
            pos: 0,
            indent_stack: vec![0],
            pending: Vec::new(),
            finished: false,
            bracket_depth: 0,
        }
    }

    fn current_indent(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    /// Measure the number of leading whitespace columns starting from `start` byte offset in `source`.
    /// Tabs advance to the next multiple of 8.
    fn measure_indent(&self, start: usize) -> usize {
        let mut col = 0;
        for ch in self.source[start..].chars() {
            match ch {
                ' ' => col += 1,
                '\t' => col = (col / 8 + 1) * 8,
                _ => break,
            }
        }
        col
    }

    /// Queue Indent/Dedent tokens by comparing `new_indent` against the top of `indent_stack`.
    fn handle_indent_change(&mut self, new_indent: usize, span: Span) {
        let current = self.current_indent();

        if new_indent > current {
            self.indent_stack.push(new_indent);
            self.pending.push((Token::Indent, span));
        } else if new_indent < current {
            while let Some(&top) = self.indent_stack.last() {
                if top <= new_indent {
                    break;
                }
                self.indent_stack.pop();
                self.pending.push((Token::Dedent, span.clone()));
            }
            // unindent does not match any outer level
            if self.current_indent() != new_indent {
                self.pending.push((Token::Error, span));
            }
        }
    }
}

impl<'src> Iterator for IndentLexer<'src> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<SpannedToken> {
        if !self.pending.is_empty() {
            return Some(self.pending.remove(0));
        }

        if self.finished {
            return None;
        }

        // Out of raw tokens: close every open block, then EOF
        if self.pos >= self.raw.len() {
            self.finished = true;
            let eof_span = self.source.len()..self.source.len();
            while self.indent_stack.len() > 1 {
                self.indent_stack.pop();
                self.pending.push((Token::Dedent, eof_span.clone()));
            }
            self.pending.push((Token::Eof, eof_span));
            return Some(self.pending.remove(0));
        }

        let (token, span) = self.raw[self.pos].clone();
        self.pos += 1;

        match &token {
            Token::LParen | Token::LBracket | Token::LBrace => {
                self.bracket_depth += 1;
                Some((token, span))
            }
            Token::RParen | Token::RBracket | Token::RBrace => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                Some((token, span))
            }

            Token::Comment => self.next(),

            Token::Newline => {
                if self.bracket_depth > 0 {
                    return self.next();
                }

                // Blank and comment-only lines carry no indentation
                while self.pos < self.raw.len() {
                    match &self.raw[self.pos].0 {
                        Token::Newline | Token::Comment => self.pos += 1,
                        _ => break,
                    }
                }

                let new_indent = if self.pos < self.raw.len() {
                    let next_start = self.raw[self.pos].1.start;
                    let line_start = self.source[..next_start]
                        .rfind('\n')
                        .map(|idx| idx + 1)
                        .unwrap_or(0);
                    self.measure_indent(line_start)
                } else {
                    0
                };

                self.handle_indent_change(new_indent, span.clone());
                Some((Token::Newline, span))
            }
            _ => Some((token, span)),
        }
    }
}
