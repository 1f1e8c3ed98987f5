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
    /// A primary followed by any number of calls, attribute accesses and subscripts.
    pub fn parse_postfix(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let mut expr = self.parse_primary()?;

        loop {
            let node = match self.peek_token() {
                Token::LParen => {
                    self.advance();
                    let (args, kwargs) = self.parse_call_args()?;
                    self.expect(Token::RParen)?;
                    Expr::Call {
                        func: Box::new(expr),
                        args,
                        kwargs,
                    }
                }
                Token::Dot => {
                    self.advance();
                    let attr = self.expect_name()?;
                    Expr::Attribute {
                        value: Box::new(expr),
                        attr,
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(Token::RBracket)?;
                    Expr::Subscript {
                        value: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                _ => break,
            };
            let end = self.current_span.end;
            expr = Spanned::new(node, start.start..end);
        }
        Ok(expr)
    }

    /// Positional arguments, then `name=value` keyword arguments.
    fn parse_call_args(
        &mut self,
    ) -> ParseResult<(Vec<Spanned<Expr>>, Vec<(String, Spanned<Expr>)>)> {
        let mut args = Vec::new();
        let mut kwargs = Vec::new();
        while self.peek_token() != Token::RParen {
            let expr = self.parse_expr()?;
            match expr.node {
                Expr::Name(name) if self.peek_token() == Token::Assign => {
                    self.advance();
                    kwargs.push((name, self.parse_expr()?));
                }
                node => {
                    if !kwargs.is_empty() {
                        return Err(ParseError::new(
                            "positional argument follows keyword argument",
                            expr.span,
                        ));
                    }
                    args.push(Spanned::new(node, expr.span));
                }
            }
            if !self.eat(Token::Comma) {
                break;
            }
        }
        Ok((args, kwargs))
    }
}
