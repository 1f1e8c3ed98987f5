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

use super::*;

impl<I: Iterator<Item = SpannedToken>> Parser<I> {
    /// Entry point for expression parsing; `or` binds loosest.
    pub fn parse_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let mut left = self.parse_and()?;
        while self.peek_is_name("or") {
            self.advance();
            let right = self.parse_and()?;
            let end = self.current_span.end;
            left = Spanned::new(
                Expr::BinOp {
                    left: Box::new(left),
                    op: BinOp::Or,
                    right: Box::new(right),
                },
                start.start..end,
            );
        }
        Ok(left)
    }

    // and
    fn parse_and(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let mut left = self.parse_not()?;
        while self.peek_is_name("and") {
            self.advance();
            let right = self.parse_not()?;
            let end = self.current_span.end;
            left = Spanned::new(
                Expr::BinOp {
                    left: Box::new(left),
                    op: BinOp::And,
                    right: Box::new(right),
                },
                start.start..end,
            );
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<Spanned<Expr>> {
        if self.peek_is_name("not") {
            let start = self.peek_span();
            self.advance();
            let operand = self.parse_not()?;
            let end = self.current_span.end;
            return Ok(Spanned::new(
                Expr::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                start.start..end,
            ));
        }
        self.parse_comparison()
    }

    /// Check if the next token is a Name whose text equals `word`.
    pub(crate) fn peek_is_name(&mut self, word: &str) -> bool {
        if self.peek_token() != Token::Name {
            return false;
        }
        let span = self.peek_span();
        self.text(&span) == word
    }

    /// Comma-separated expressions up to (not including) `close`.
    fn parse_expr_list(&mut self, close: Token) -> ParseResult<Vec<Spanned<Expr>>> {
        let mut elems = Vec::new();
        while self.peek_token() != close {
            elems.push(self.parse_expr()?);
            if !self.eat(Token::Comma) {
                break;
            }
        }
        Ok(elems)
    }

    pub(crate) fn parse_primary(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let tok = self.peek_token();

        match tok {
            Token::Name => {
                self.advance();
                let name = self.last_text().to_string();
                Ok(Spanned::new(Expr::Name(name), start))
            }
            Token::Number => {
                self.advance();
                let text = self.last_text().to_string();
                Ok(Spanned::new(Expr::Number(text), start))
            }
            Token::String => {
                self.advance();
                let text = self.last_text().to_string();
                Ok(Spanned::new(Expr::StringLit(text), start))
            }
            Token::True => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(true), start))
            }
            Token::False => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(false), start))
            }
            Token::None_ => {
                self.advance();
                Ok(Spanned::new(Expr::NoneLit, start))
            }
            Token::LParen => {
                self.advance(); // consume `(`
                if self.eat(Token::RParen) {
                    let end = self.current_span.end;
                    return Ok(Spanned::new(Expr::Tuple(Vec::new()), start.start..end));
                }
                let expr = self.parse_expr()?;
                if self.eat(Token::Comma) {
                    let mut elems = vec![expr];
                    elems.extend(self.parse_expr_list(Token::RParen)?);
                    self.expect(Token::RParen)?;
                    let end = self.current_span.end;
                    return Ok(Spanned::new(Expr::Tuple(elems), start.start..end));
                }
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::LBracket => {
                self.advance(); // consume `[`
                let elems = self.parse_expr_list(Token::RBracket)?;
                self.expect(Token::RBracket)?;
                let end = self.current_span.end;
                Ok(Spanned::new(Expr::List(elems), start.start..end))
            }
            _ => Err(ParseError::new(
                format!("unexpected token {:?}", tok),
                start,
            )),
        }
    }
}
