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
use ast::types::TypeHint;

impl<I: Iterator<Item = SpannedToken>> Parser<I> {
    pub(crate) fn parse_stmt(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.peek_span();
        let tok = self.peek_token();
        let stmt = match tok {
            Token::Def => self.parse_func_def()?,
            Token::If => self.parse_if()?,
            Token::While => self.parse_while()?,
            Token::For => self.parse_for()?,
            Token::Return => self.parse_return()?,
            Token::Pass => {
                self.advance();
                self.end_simple_stmt()?;
                Stmt::Pass
            }
            Token::Break => {
                self.advance();
                self.end_simple_stmt()?;
                Stmt::Break
            }
            Token::Continue => {
                self.advance();
                self.end_simple_stmt()?;
                Stmt::Continue
            }
            Token::At => {
                return Err(ParseError::new("decorators are not supported", start));
            }
            ref t if t.is_unsupported_keyword() => {
                return Err(ParseError::new(
                    format!("'{}' statements are not supported", self.text(&start)),
                    start,
                ));
            }
            _ => self.parse_expr_or_assign_stmt()?,
        };
        let end = self.current_span.end;
        Ok(Spanned::new(stmt, start.start..end))
    }

    // --- Simple statements ---

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `return`
        let value = match self.peek_token() {
            Token::Newline | Token::Semicolon | Token::Dedent | Token::Eof => None,
            _ => Some(self.parse_expr()?),
        };
        self.end_simple_stmt()?;
        Ok(Stmt::Return(value))
    }

    fn try_aug_op(&mut self) -> Option<AugOp> {
        let op = match self.peek_token() {
            Token::PlusAssign => AugOp::Add,
            Token::MinusAssign => AugOp::Sub,
            Token::StarAssign => AugOp::Mul,
            Token::SlashAssign => AugOp::Div,
            Token::FloorDivAssign => AugOp::FloorDiv,
            Token::PercentAssign => AugOp::Mod,
            Token::PowAssign => AugOp::Pow,
            Token::ShiftLeftAssign => AugOp::LShift,
            Token::ShiftRightAssign => AugOp::RShift,
            Token::AmpAssign => AugOp::BitAnd,
            Token::PipeAssign => AugOp::BitOr,
            Token::CaretAssign => AugOp::BitXor,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn parse_expr_or_assign_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;

        if let Some(op) = self.try_aug_op() {
            let value = self.parse_expr()?;
            self.end_simple_stmt()?;
            return Ok(Stmt::AugAssign {
                target: expr,
                op,
                value,
            });
        }

        // `expr: type` or `expr: type = value`
        if self.eat(Token::Colon) {
            let type_hint = self.parse_type_hint()?;
            let value = if self.eat(Token::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.end_simple_stmt()?;
            return Ok(Stmt::Assign {
                targets: vec![expr],
                value,
                type_hint: Some(type_hint),
            });
        }

        if self.eat(Token::Assign) {
            // Chained assignment: `a = b = c`
            let mut targets = vec![expr];
            let mut value = self.parse_expr()?;
            while self.eat(Token::Assign) {
                targets.push(value);
                value = self.parse_expr()?;
            }
            self.end_simple_stmt()?;
            return Ok(Stmt::Assign {
                targets,
                value: Some(value),
                type_hint: None,
            });
        }

        self.end_simple_stmt()?;
        Ok(Stmt::Expr(expr))
    }

    // --- Compound statements ---

    fn parse_else_block(&mut self) -> ParseResult<Option<Vec<Spanned<Stmt>>>> {
        if self.eat(Token::Else) {
            self.expect(Token::Colon)?;
            Ok(Some(self.parse_block()?))
        } else {
            Ok(None)
        }
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `if`
        let test = self.parse_expr()?;
        self.expect(Token::Colon)?;
        let body = self.parse_block()?;

        let mut elif_clauses = Vec::new();
        while self.eat(Token::Elif) {
            let elif_test = self.parse_expr()?;
            self.expect(Token::Colon)?;
            let elif_body = self.parse_block()?;
            elif_clauses.push((elif_test, elif_body));
        }

        let else_body = self.parse_else_block()?;

        Ok(Stmt::If {
            test,
            body,
            elif_clauses,
            else_body,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `while`
        let test = self.parse_expr()?;
        self.expect(Token::Colon)?;
        let body = self.parse_block()?;
        let else_body = self.parse_else_block()?;
        Ok(Stmt::While {
            test,
            body,
            else_body,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `for`
        let target = self.parse_postfix()?;
        // `in` is lexed as a Name token
        if self.peek_is_name("in") {
            self.advance();
        } else {
            return Err(ParseError::new("expected 'in' in for loop", self.peek_span()));
        }
        let iter = self.parse_expr()?;
        self.expect(Token::Colon)?;
        let body = self.parse_block()?;
        let else_body = self.parse_else_block()?;
        Ok(Stmt::For {
            target,
            iter,
            body,
            else_body,
        })
    }

    fn parse_func_def(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `def`
        let name = self.expect_name()?;
        self.expect(Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(Token::RParen)?;
        let return_type_hint = if self.eat(Token::Arrow) {
            Some(self.parse_type_hint()?)
        } else {
            None
        };
        self.expect(Token::Colon)?;
        let body = self.parse_block()?;
        Ok(Stmt::FuncDef {
            name,
            params,
            return_type_hint,
            body,
        })
    }

    pub(crate) fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.peek_token() == Token::RParen {
            return Ok(params);
        }
        loop {
            let name = self.expect_name()?;
            let type_hint: Option<Spanned<TypeHint>> = if self.eat(Token::Colon) {
                Some(self.parse_type_hint()?)
            } else {
                None
            };
            let default = if self.eat(Token::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            params.push(Param {
                name,
                type_hint,
                default,
            });
            if !self.eat(Token::Comma) {
                break;
            }
            // Allow trailing comma before `)`
            if self.peek_token() == Token::RParen {
                break;
            }
        }
        Ok(params)
    }
}
