//! Front-matter splitting and parsing
//!
//! The front-matter block sits at the head of a source file, surrounded by
//! lines composed entirely of a delimiter character (`+` by default):
//!
//! ```text
//! ++++
//! title = "Hello"
//! publish_date = "15-01-2024 10:30"
//! tags = ["rust", "ssg"]
//! ++++
//! body text...
//! ```
//!
//! The block is a sequence of `key = value` bindings. Values are parsed by a
//! restricted declarative grammar (strings, numbers, booleans, lists and
//! tuples); content metadata is never evaluated as code.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use thiserror::Error;

/// The parsed front matter of a page: an ordered, string-keyed map.
pub type FrontMatter = IndexMap<String, Value>;

/// A front-matter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Both `[..]` lists and `(..)` tuples parse to a list.
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value the way it would appear in a template context.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front-matter line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Splits `source` into its front matter and its body.
///
/// The first line must be composed solely of the delimiter character for a
/// front-matter block to exist at all; otherwise the whole source is the
/// body. A later delimiter-only line closes the block. Without a closing
/// line everything after the opening one is front matter and the body is
/// empty.
pub fn split_front_matter(
    source: &str,
    delimiter: char,
) -> Result<(FrontMatter, String), FrontMatterError> {
    if source.is_empty() {
        return Ok((FrontMatter::new(), String::new()));
    }

    let lines: Vec<&str> = source.lines().collect();
    if !is_delimiter_line(lines[0], delimiter) {
        return Ok((FrontMatter::new(), source.to_string()));
    }

    let mut block = String::new();
    let mut body = String::new();
    for (i, line) in lines[1..].iter().enumerate() {
        if is_delimiter_line(line, delimiter) {
            body = lines[i + 2..].join("\n");
            break;
        }
        block.push_str(line);
        block.push('\n');
    }

    Ok((parse_bindings(&block)?, body))
}

fn is_delimiter_line(line: &str, delimiter: char) -> bool {
    !line.is_empty() && line.chars().all(|c| c == delimiter)
}

/// Parses a block of `key = value` bindings.
fn parse_bindings(block: &str) -> Result<FrontMatter, FrontMatterError> {
    let mut map = FrontMatter::new();

    for (i, raw_line) in block.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_err = |message: String| FrontMatterError::Parse {
            line: i + 1,
            message,
        };

        let (key, rest) = line
            .split_once('=')
            .ok_or_else(|| parse_err("expected 'key = value'".to_string()))?;
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(parse_err(format!("invalid key '{key}'")));
        }

        let mut cursor = Cursor::new(rest);
        let value = cursor.parse_value().map_err(&parse_err)?;
        cursor.skip_whitespace();
        if let Some(c) = cursor.peek() {
            if c != '#' {
                return Err(parse_err(format!("unexpected trailing input at '{c}'")));
            }
        }

        map.insert(key.to_string(), value);
    }

    Ok(map)
}

/// A minimal recursive-descent cursor over one value expression.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn parse_value(&mut self) -> Result<Value, String> {
        self.skip_whitespace();
        match self.peek() {
            Some('"') | Some('\'') => self.parse_string(),
            Some('[') => self.parse_sequence(']'),
            Some('(') => self.parse_sequence(')'),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => self.parse_number(),
            Some(_) => self.parse_keyword(),
            None => Err("expected a value".to_string()),
        }
    }

    fn parse_string(&mut self) -> Result<Value, String> {
        let quote = self.bump().ok_or("expected a quote")?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(Value::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => return Err("unterminated escape in string".to_string()),
                },
                Some(c) => out.push(c),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn parse_sequence(&mut self, close: char) -> Result<Value, String> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(c) if c == close => {
                    self.bump();
                    return Ok(Value::List(items));
                }
                Some(_) => {
                    items.push(self.parse_value()?);
                    self.skip_whitespace();
                    if self.peek() == Some(',') {
                        self.bump();
                    } else if self.peek() != Some(close) {
                        return Err(format!("expected ',' or '{close}' in sequence"));
                    }
                }
                None => return Err(format!("unterminated sequence, expected '{close}'")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, String> {
        let mut text = String::new();
        if matches!(self.peek(), Some('-') | Some('+')) {
            text.push(self.bump().ok_or("expected a sign")?);
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.' || c == '_') {
            let c = self.bump().ok_or("expected a digit")?;
            if c != '_' {
                text.push(c);
            }
        }
        if text.contains('.') {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("invalid number '{text}'"))
        } else {
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("invalid number '{text}'"))
        }
    }

    fn parse_keyword(&mut self) -> Result<Value, String> {
        let mut word = String::new();
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            word.push(self.bump().ok_or("expected a keyword")?);
        }
        match word.as_str() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Str(String::new())),
            _ => Err(format!("unrecognised value '{word}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_front_matter() {
        let (fm, body) = split_front_matter("just a body\nwith lines", '+').unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "just a body\nwith lines");
    }

    #[test]
    fn test_empty_source() {
        let (fm, body) = split_front_matter("", '+').unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn test_basic_block() {
        let source = "++++\ntitle = \"Hello World\"\ndraft = false\n++++\nThe body.";
        let (fm, body) = split_front_matter(source, '+').unwrap();
        assert_eq!(fm.get("title"), Some(&Value::Str("Hello World".to_string())));
        assert_eq!(fm.get("draft"), Some(&Value::Bool(false)));
        assert_eq!(body, "The body.");
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let source = "+++\ntitle = 'open ended'\nnumber = 42";
        let (fm, body) = split_front_matter(source, '+').unwrap();
        assert_eq!(fm.get("number"), Some(&Value::Int(42)));
        assert_eq!(body, "");
    }

    #[test]
    fn test_lists_and_tuples() {
        let source = "++\ntags = [\"a\", \"b\"]\npair = (1, 2.5)\n++\nbody";
        let (fm, _) = split_front_matter(source, '+').unwrap();
        assert_eq!(
            fm.get("tags"),
            Some(&Value::List(vec![
                Value::Str("a".to_string()),
                Value::Str("b".to_string())
            ]))
        );
        assert_eq!(
            fm.get("pair"),
            Some(&Value::List(vec![Value::Int(1), Value::Float(2.5)]))
        );
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let source = "+\n# a comment\n\nkey = \"v\"  # trailing\n+\n";
        let (fm, _) = split_front_matter(source, '+').unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.get("key"), Some(&Value::Str("v".to_string())));
    }

    #[test]
    fn test_alternate_delimiter() {
        let source = "----\ntitle = \"dashes\"\n----\nbody";
        let (fm, body) = split_front_matter(source, '-').unwrap();
        assert_eq!(fm.get("title"), Some(&Value::Str("dashes".to_string())));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let source = "+\nkey = exec(\"rm -rf\")\n+\n";
        assert!(split_front_matter(source, '+').is_err());
    }

    #[test]
    fn test_split_reassembly_round_trip() {
        let fm_text = "title = \"Round Trip\"\ncount = 3\n";
        let source = format!("++++\n{fm_text}++++\nbody line one\nbody line two");
        let (fm, body) = split_front_matter(&source, '+').unwrap();

        let reassembled = format!("++++\n{fm_text}++++\n{body}");
        let (fm2, body2) = split_front_matter(&reassembled, '+').unwrap();
        assert_eq!(fm, fm2);
        assert_eq!(body, body2);
    }
}
