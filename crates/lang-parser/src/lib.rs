// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Lang scripting language.
//!
//! Reads source line by line and builds the AST. Parsing never stops at a
//! malformed construct; it inserts a [`lang_ast::Node::ParsingError`]
//! node and carries on.

mod condition;
pub mod hints;
mod line;
mod parser;
mod value;

pub use condition::parse_condition;
pub use line::{LineReader, LogicalLine};
pub use parser::{is_pointer_name, is_variable_name, parse_str, Parser};
pub use value::{is_decimal, parse_literal, parse_value};

#[cfg(test)]
mod tests {
    use super::*;
    use lang_ast::Node;

    #[test]
    fn parse_reader() {
        let source = "# greeting\n$name = World\nfunc.println(Hello $name!)\n";
        let ast = Parser::new(std::io::Cursor::new(source)).parse().unwrap();
        assert_eq!(ast.len(), 2);
        assert!(matches!(&ast[1], Node::FunctionCall { name, .. } if name == "func.println"));
    }

    #[test]
    fn parse_demo_scripts() {
        let demos_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent().unwrap()
            .parent().unwrap()
            .join("demos");

        for entry in std::fs::read_dir(&demos_dir).expect("demos directory not found") {
            let path = entry.unwrap().path();
            if path.extension().map(|e| e == "lang").unwrap_or(false) {
                let src = std::fs::read_to_string(&path)
                    .unwrap_or_else(|_| panic!("Failed to read {}", path.display()));
                let ast = parse_str(&src);
                assert!(
                    !ast.iter().any(|n| matches!(n, Node::ParsingError { .. })),
                    "Parse errors in {}: {:?}",
                    path.display(),
                    ast
                );
            }
        }
    }
}
