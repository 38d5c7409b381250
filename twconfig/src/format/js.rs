//! JavaScript module configs.
//!
//! Only the declarative subset is read: a single `module.exports = <literal>`
//! or `export default <literal>` statement, where the literal is built from
//! objects, arrays, strings, numbers, booleans and `null`. Plugin entries may
//! be written as `require("name")` or `require("name")(<literal>)`. Anything
//! that would need a JavaScript engine to evaluate is rejected with a
//! `line:column` location.

use serde_json::{Map, Number, Value};

/// Deepest nesting of objects, arrays and plugin options accepted.
const MAX_NESTING: usize = 128;

/// Parse a JavaScript config module into a value tree.
///
/// # Errors
///
/// Returns `line:column: message` for the first unsupported or malformed
/// construct.
pub fn parse_module(content: &str) -> Result<Value, String> {
    let mut parser = Parser::new(content);
    parser.skip_trivia();
    parser.export_head()?;
    let value = parser.value()?;
    parser.skip_trivia();
    parser.eat(';');
    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.error("unexpected content after the exported value"));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        Self {
            chars: content.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn error(&self, message: &str) -> String {
        let mut line = 1;
        let mut column = 1;
        for ch in self.chars.iter().take(self.pos) {
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        format!("{line}:{column}: {message}")
    }

    /// Skip whitespace, `//` line comments and `/* */` block comments.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(ch), _) if ch.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.bump() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    while !self.at_end() && !(self.peek() == Some('*') && self.peek_at(1) == Some('/'))
                    {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                _ => return,
            }
        }
    }

    fn identifier(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' || ch == '$' => self.pos += 1,
            _ => return None,
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
                self.pos += 1;
            } else {
                break;
            }
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn keyword(&mut self, word: &str) -> Result<(), String> {
        let start = self.pos;
        match self.identifier() {
            Some(found) if found == word => Ok(()),
            _ => {
                self.pos = start;
                Err(self.error(&format!("expected '{word}'")))
            }
        }
    }

    /// `module.exports =` or `export default`.
    fn export_head(&mut self) -> Result<(), String> {
        let start = self.pos;
        match self.identifier().as_deref() {
            Some("module") => {
                self.skip_trivia();
                self.expect('.')?;
                self.skip_trivia();
                self.keyword("exports")?;
                self.skip_trivia();
                self.expect('=')?;
            }
            Some("export") => {
                self.skip_trivia();
                self.keyword("default")?;
            }
            _ => {
                self.pos = start;
                return Err(
                    self.error("expected `module.exports =` or `export default` statement")
                );
            }
        }
        self.skip_trivia();
        Ok(())
    }

    fn value(&mut self) -> Result<Value, String> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(&format!("nesting deeper than {MAX_NESTING} levels")));
        }
        self.depth += 1;
        let value = self.literal();
        self.depth -= 1;
        value
    }

    fn literal(&mut self) -> Result<Value, String> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(quote @ ('"' | '\'' | '`')) => {
                self.pos += 1;
                self.string(quote).map(Value::String)
            }
            Some(ch) if ch == '-' || ch == '.' || ch.is_ascii_digit() => self.number(),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' || ch == '$' => self.word_value(),
            Some(_) => Err(self.error("expected a literal value")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn word_value(&mut self) -> Result<Value, String> {
        let start = self.pos;
        let word = self.identifier().unwrap_or_default();
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            "require" => self.require_call(),
            _ => {
                self.pos = start;
                Err(self.error(&format!(
                    "'{word}' is not a literal; only declarative values are supported"
                )))
            }
        }
    }

    /// `require("name")` or `require("name")(<literal>)`.
    fn require_call(&mut self) -> Result<Value, String> {
        self.skip_trivia();
        self.expect('(')?;
        self.skip_trivia();
        let name = match self.peek() {
            Some(quote @ ('"' | '\'' | '`')) => {
                self.pos += 1;
                self.string(quote)?
            }
            _ => return Err(self.error("require() expects a string module name")),
        };
        self.skip_trivia();
        self.expect(')')?;

        let before_call = self.pos;
        self.skip_trivia();
        if !self.eat('(') {
            self.pos = before_call;
            return Ok(Value::String(name));
        }

        let mut plugin = Map::new();
        plugin.insert("name".to_owned(), Value::String(name));
        self.skip_trivia();
        if !self.eat(')') {
            let options = self.value()?;
            self.skip_trivia();
            self.eat(',');
            self.skip_trivia();
            self.expect(')')?;
            plugin.insert("options".to_owned(), options);
        }
        Ok(Value::Object(plugin))
    }

    fn object(&mut self) -> Result<Value, String> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = self.key()?;
            self.skip_trivia();
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_trivia();
            if !self.eat(',') {
                self.skip_trivia();
                self.expect('}')?;
                return Ok(Value::Object(map));
            }
        }
    }

    fn key(&mut self) -> Result<String, String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.string(quote)
            }
            Some(ch) if ch.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            Some('[') => Err(self.error("computed keys are not supported")),
            Some('.') => Err(self.error("spread syntax is not supported")),
            _ => self
                .identifier()
                .ok_or_else(|| self.error("expected an object key")),
        }
    }

    fn array(&mut self) -> Result<Value, String> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            if self.peek() == Some(',') {
                return Err(self.error("array holes are not supported"));
            }
            items.push(self.value()?);
            self.skip_trivia();
            if !self.eat(',') {
                self.skip_trivia();
                self.expect(']')?;
                return Ok(Value::Array(items));
            }
        }
    }

    /// Body of a string literal; the opening quote is already consumed.
    fn string(&mut self, quote: char) -> Result<String, String> {
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(self.error("unterminated string literal"));
            };
            match ch {
                c if c == quote => return Ok(out),
                '\n' if quote != '`' => {
                    return Err(self.error("unterminated string literal"));
                }
                '$' if quote == '`' && self.peek() == Some('{') => {
                    self.pos -= 1;
                    return Err(self.error("template interpolation is not supported"));
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), String> {
        match self.bump() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('\n') => {}
            Some('x') => {
                let code = self.hex_digits(2)?;
                out.push(self.code_point(code)?);
            }
            Some('u') => {
                let code = if self.eat('{') {
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                    let digits: String = self.chars[start..self.pos].iter().collect();
                    self.expect('}')?;
                    u32::from_str_radix(&digits, 16)
                        .map_err(|_| self.error("invalid unicode escape"))?
                } else {
                    self.hex_digits(4)?
                };
                out.push(self.code_point(code)?);
            }
            Some(c) => out.push(c),
            None => return Err(self.error("unexpected end of input after backslash")),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, String> {
        let mut code = 0;
        for _ in 0..count {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn code_point(&self, code: u32) -> Result<char, String> {
        char::from_u32(code).ok_or_else(|| self.error(&format!("invalid code point {code:#x}")))
    }

    fn number(&mut self) -> Result<Value, String> {
        let start = self.pos;
        self.eat('-');
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_'))
            || (matches!(self.peek(), Some('+' | '-'))
                && matches!(self.chars.get(self.pos.wrapping_sub(1)), Some(&('e' | 'E'))))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();

        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| {
                self.pos = start;
                self.error(&format!("invalid number literal '{text}'"))
            })
    }
}
