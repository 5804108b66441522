// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the Lang scripting language.
//!
//! Tokenizes the value text of one logical line. Lexing never fails:
//! anything that is not a name, escape or delimiter is text.

mod lexer;

pub use lexer::{tokenize, Lexer};
