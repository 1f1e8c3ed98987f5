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

type LevelFn<I> = fn(&mut Parser<I>) -> ParseResult<Spanned<Expr>>;

impl<I: Iterator<Item = SpannedToken>> Parser<I> {
    /// One left-associative precedence level: `next (op next)*`.
    fn parse_binary_level(
        &mut self,
        next: LevelFn<I>,
        op_for: fn(&Token) -> Option<BinOp>,
    ) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let mut left = next(self)?;
        while let Some(op) = op_for(&self.peek_token()) {
            self.advance();
            let right = next(self)?;
            let end = self.current_span.end;
            left = Spanned::new(
                Expr::BinOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                start.start..end,
            );
        }
        Ok(left)
    }

    fn comparison_op(&mut self) -> ParseResult<Option<CmpOp>> {
        let op = match self.peek_token() {
            Token::Eq => CmpOp::Eq,
            Token::NotEq => CmpOp::NotEq,
            Token::Lt => CmpOp::Lt,
            Token::Gt => CmpOp::Gt,
            Token::Le => CmpOp::LtE,
            Token::Ge => CmpOp::GtE,
            Token::Name if self.peek_is_name("in") => CmpOp::In,
            Token::Name if self.peek_is_name("is") => {
                self.advance();
                return Ok(Some(if self.peek_is_name("not") {
                    self.advance();
                    CmpOp::IsNot
                } else {
                    CmpOp::Is
                }));
            }
            Token::Name if self.peek_is_name("not") => {
                self.advance();
                if !self.peek_is_name("in") {
                    return Err(ParseError::new(
                        "expected 'in' after 'not' in comparison",
                        self.peek_span(),
                    ));
                }
                CmpOp::NotIn
            }
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(op))
    }

    /// Comparison, possibly chained: `1 < x < 10`
    pub fn parse_comparison(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let left = self.parse_bitor()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();

        while let Some(op) = self.comparison_op()? {
            ops.push(op);
            comparators.push(self.parse_bitor()?);
        }

        if ops.is_empty() {
            return Ok(left);
        }
        let end = self.current_span.end;
        Ok(Spanned::new(
            Expr::Compare {
                left: Box::new(left),
                ops,
                comparators,
            },
            start.start..end,
        ))
    }

    fn parse_bitor(&mut self) -> ParseResult<Spanned<Expr>> {
        self.parse_binary_level(Self::parse_bitxor, |t| match t {
            Token::Pipe => Some(BinOp::BitOr),
            _ => None,
        })
    }

    fn parse_bitxor(&mut self) -> ParseResult<Spanned<Expr>> {
        self.parse_binary_level(Self::parse_bitand, |t| match t {
            Token::Caret => Some(BinOp::BitXor),
            _ => None,
        })
    }

    fn parse_bitand(&mut self) -> ParseResult<Spanned<Expr>> {
        self.parse_binary_level(Self::parse_shift, |t| match t {
            Token::Amp => Some(BinOp::BitAnd),
            _ => None,
        })
    }

    fn parse_shift(&mut self) -> ParseResult<Spanned<Expr>> {
        self.parse_binary_level(Self::parse_arith, |t| match t {
            Token::ShiftLeft => Some(BinOp::LShift),
            Token::ShiftRight => Some(BinOp::RShift),
            _ => None,
        })
    }

    fn parse_arith(&mut self) -> ParseResult<Spanned<Expr>> {
        self.parse_binary_level(Self::parse_term, |t| match t {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    fn parse_term(&mut self) -> ParseResult<Spanned<Expr>> {
        self.parse_binary_level(Self::parse_factor, |t| match t {
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::FloorDiv => Some(BinOp::FloorDiv),
            Token::Percent => Some(BinOp::Mod),
            Token::At => Some(BinOp::MatMul),
            _ => None,
        })
    }

    // Unary: +x, -x, ~x
    pub(crate) fn parse_factor(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let op = match self.peek_token() {
            Token::Plus => UnaryOp::Pos,
            Token::Minus => UnaryOp::Neg,
            Token::Tilde => UnaryOp::Invert,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_factor()?;
        let end = self.current_span.end;
        Ok(Spanned::new(
            Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            start.start..end,
        ))
    }

    // ** (right-associative, binds tighter than unary on its left)
    fn parse_power(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek_span();
        let base = self.parse_postfix()?;
        if !self.eat(Token::Pow) {
            return Ok(base);
        }
        let exp = self.parse_factor()?;
        let end = self.current_span.end;
        Ok(Spanned::new(
            Expr::BinOp {
                left: Box::new(base),
                op: BinOp::Pow,
                right: Box::new(exp),
            },
            start.start..end,
        ))
    }
}
