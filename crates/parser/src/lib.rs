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

//! Front-end for the typed Python subset: an indentation-aware `logos` lexer
//! and a recursive-descent parser producing an [`ast::Module`].

pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;

use ast::Module;

pub use lexer::{IndentLexer, Token};
pub use parser::{ParseError, Parser};

/// Lex and parse a complete source text.
pub fn parse_source(source: &str) -> Result<Module, ParseError> {
    let lexer = IndentLexer::new(source);
    let mut parser = Parser::new(source, lexer);
    parser.parse_module()
}
