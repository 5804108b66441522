// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Physical to logical line conversion.
//!
//! Verbatim blocks are expanded first, then comments are stripped, then
//! backslash continuations are joined. Empty lines never reach the parser.

use std::io::{self, BufRead};

/// Characters escaped inside `{{{ ... }}}` blocks.
const VERBATIM_ESCAPED: &[char] = &[
    '\\', '$', '&', '(', ')', ',', '.', '#', '{', '}', '[', ']', '=', '!', '<', '>', '|',
];

/// A trimmed, non-empty logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub text: String,
    /// 1-based number of the first physical line
    pub number: usize,
    /// Set when a verbatim block was never closed
    pub unterminated: bool,
}

pub struct LineReader<R: BufRead> {
    reader: R,
    line_number: usize,
    pushed_back: Option<LogicalLine>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pushed_back: None,
        }
    }

    /// Return a line so the next call to [`next_line`](Self::next_line)
    /// yields it again.
    pub fn push_back(&mut self, line: LogicalLine) {
        self.pushed_back = Some(line);
    }

    pub fn next_line(&mut self) -> io::Result<Option<LogicalLine>> {
        if let Some(line) = self.pushed_back.take() {
            return Ok(Some(line));
        }

        loop {
            let Some(raw) = self.read_physical()? else {
                return Ok(None);
            };
            let number = self.line_number;

            let Some(expanded) = self.expand_verbatim(raw)? else {
                return Ok(Some(LogicalLine {
                    text: String::new(),
                    number,
                    unterminated: true,
                }));
            };
            let mut line = strip_comment(&expanded);

            while ends_with_odd_backslashes(&line) {
                line.pop();
                let Some(next) = self.read_physical()? else {
                    break;
                };
                let Some(next) = self.expand_verbatim(next)? else {
                    return Ok(Some(LogicalLine {
                        text: String::new(),
                        number,
                        unterminated: true,
                    }));
                };
                line.push_str(&strip_comment(&next));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Some(LogicalLine {
                text: trimmed.to_string(),
                number,
                unterminated: false,
            }));
        }
    }

    fn read_physical(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    /// Replace every `{{{ ... }}}` block with its escaped content. Returns
    /// `None` if input ends inside a block.
    fn expand_verbatim(&mut self, line: String) -> io::Result<Option<String>> {
        let mut out = String::new();
        let mut rest = line;
        loop {
            let Some(start) = rest.find("{{{") else {
                out.push_str(&rest);
                return Ok(Some(out));
            };
            out.push_str(&rest[..start]);
            let mut content = rest[start + 3..].to_string();
            loop {
                if let Some(end) = content.find("}}}") {
                    escape_verbatim(&content[..end], &mut out);
                    rest = content[end + 3..].to_string();
                    break;
                }
                match self.read_physical()? {
                    Some(next) => {
                        content.push('\n');
                        content.push_str(&next);
                    }
                    None => return Ok(None),
                }
            }
        }
    }
}

fn escape_verbatim(content: &str, out: &mut String) {
    for c in content.chars() {
        if c == '\n' {
            out.push_str("\\n");
        } else {
            if VERBATIM_ESCAPED.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
    }
}

/// Cut the line at the first unescaped `#` and unescape `\#`.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut backslashes = 0usize;
    for c in line.chars() {
        if c == '#' {
            if backslashes % 2 == 0 {
                break;
            }
            out.pop();
            out.push('#');
            backslashes = 0;
            continue;
        }
        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
        out.push(c);
    }
    out
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}
