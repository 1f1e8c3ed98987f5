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

use logos::Span;
use thiserror::Error;

/// Everything that can stop the compilation of a function.
///
/// Compilation of the offending function stops at the first error; nothing
/// it would have contributed (signature, code, imports) is kept. User-facing
/// variants carry the byte range of the innermost statement or expression
/// that was being processed, once one is known.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A source construct with no lowering into the IR.
    #[error("unsupported syntax ({}){}: {}", .construct, located(.span), .detail)]
    SyntaxUnsupported {
        construct: &'static str,
        detail: String,
        span: Option<Span>,
    },

    #[error("TypeError{}: {}", located(.span), .message)]
    Type { message: String, span: Option<Span> },

    /// Unresolved or duplicate names.
    #[error("NameError{}: {}", located(.span), .message)]
    Name { message: String, span: Option<Span> },

    /// Argument count/type mismatch against a resolved signature.
    #[error("SignatureError{}: {}", located(.span), .message)]
    Signature { message: String, span: Option<Span> },

    /// A pipeline stage observed state an earlier stage should have produced.
    #[error("internal compiler error: {0}")]
    Internal(String),
}

fn located(span: &Option<Span>) -> String {
    match span {
        Some(span) => format!(" at {}..{}", span.start, span.end),
        None => String::new(),
    }
}

impl CompileError {
    pub fn unsupported(construct: &'static str, detail: impl Into<String>) -> Self {
        CompileError::SyntaxUnsupported {
            construct,
            detail: detail.into(),
            span: None,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        CompileError::Type {
            message: message.into(),
            span: None,
        }
    }

    pub fn name_error(message: impl Into<String>) -> Self {
        CompileError::Name {
            message: message.into(),
            span: None,
        }
    }

    pub fn signature_error(message: impl Into<String>) -> Self {
        CompileError::Signature {
            message: message.into(),
            span: None,
        }
    }

    /// Source location of the fault, if known.
    pub fn span(&self) -> Option<&Span> {
        match self {
            CompileError::SyntaxUnsupported { span, .. }
            | CompileError::Type { span, .. }
            | CompileError::Name { span, .. }
            | CompileError::Signature { span, .. } => span.as_ref(),
            CompileError::Internal(_) => None,
        }
    }

    /// Attach `at` unless a more precise location is already set.
    pub fn at(mut self, at: &Span) -> Self {
        match &mut self {
            CompileError::SyntaxUnsupported { span, .. }
            | CompileError::Type { span, .. }
            | CompileError::Name { span, .. }
            | CompileError::Signature { span, .. } => {
                if span.is_none() {
                    *span = Some(at.clone());
                }
            }
            CompileError::Internal(_) => {}
        }
        self
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
