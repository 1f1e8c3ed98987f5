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
    /// Parse a type hint: `int`, `float`, `str`, `bool`, `None`, any other
    /// name, or a subscripted generic such as `list[int]` / `Dict[str, int]`.
    pub(crate) fn parse_type_hint(&mut self) -> ParseResult<Spanned<TypeHint>> {
        let start = self.peek_span();

        if self.eat(Token::None_) {
            return Ok(Spanned::new(TypeHint::None, start));
        }

        let name = self.expect_name()?;

        if self.eat(Token::LBracket) {
            let mut args = Vec::new();
            if self.peek_token() != Token::RBracket {
                args.push(self.parse_type_hint()?.node);
                while self.eat(Token::Comma) {
                    if self.peek_token() == Token::RBracket {
                        break;
                    }
                    args.push(self.parse_type_hint()?.node);
                }
            }
            self.expect(Token::RBracket)?;
            let end = self.current_span.end;
            return Ok(Spanned::new(TypeHint::Generic(name, args), start.start..end));
        }

        let hint = match name.as_str() {
            "int" => TypeHint::Int,
            "float" => TypeHint::Float,
            "str" => TypeHint::Str,
            "bool" => TypeHint::Bool,
            _ => TypeHint::Custom(name),
        };
        let end = self.current_span.end;
        Ok(Spanned::new(hint, start.start..end))
    }
}
