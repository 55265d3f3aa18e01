//! Textual type hint parser
//!
//! Recursive descent over:
//!
//! ```text
//! union   := primary ('|' primary)*
//! primary := NAME ('[' union (',' union)* ']')?
//! NAME    := ident ('.' ident)*
//! ```
//!
//! Record types are resolved by name from the records registered on the
//! parser. Names with no mapping become [`TypeHint::Opaque`].

use std::collections::HashMap;
use std::sync::Arc;

use super::errors::{HintParseError, HintResult};
use super::types::{RecordDef, TypeHint, TypeHints};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    LBracket,
    RBracket,
    Comma,
    Pipe,
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Name(name) => format!("'{}'", name),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::End => "end of input".to_string(),
        }
    }
}

fn tokenize(text: &str) -> HintResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' => {
                tokens.push((Token::LBracket, pos));
                chars.next();
            }
            ']' => {
                tokens.push((Token::RBracket, pos));
                chars.next();
            }
            ',' => {
                tokens.push((Token::Comma, pos));
                chars.next();
            }
            '|' => {
                tokens.push((Token::Pipe, pos));
                chars.next();
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Name(name), pos));
            }
            other => return Err(HintParseError::UnexpectedChar { ch: other, pos }),
        }
    }

    tokens.push((Token::End, text.len()));
    Ok(tokens)
}

/// Parses textual hints such as `dict[str, list[int]]` or `int | None`.
#[derive(Debug, Clone, Default)]
pub struct HintParser {
    records: HashMap<String, Arc<RecordDef>>,
}

impl HintParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a record type resolvable by its name.
    pub fn with_record(mut self, def: RecordDef) -> Self {
        self.register(def);
        self
    }

    pub fn register(&mut self, def: RecordDef) {
        self.records.insert(def.name.clone(), Arc::new(def));
    }

    /// Parses a single hint.
    pub fn parse(&self, text: &str) -> HintResult<TypeHint> {
        if text.trim().is_empty() {
            return Err(HintParseError::Empty);
        }
        let tokens = tokenize(text)?;
        let mut cursor = Cursor { tokens, index: 0 };
        let hint = self.parse_union(&mut cursor)?;
        match cursor.peek() {
            (Token::End, _) => Ok(hint),
            (_, pos) => Err(HintParseError::TrailingInput(*pos)),
        }
    }

    /// Parses the input and output hints of a predict function.
    pub fn parse_hints(&self, input: Option<&str>, output: Option<&str>) -> HintResult<TypeHints> {
        Ok(TypeHints {
            input: input.map(|text| self.parse(text)).transpose()?,
            output: output.map(|text| self.parse(text)).transpose()?,
        })
    }

    fn parse_union(&self, cursor: &mut Cursor) -> HintResult<TypeHint> {
        let mut members = vec![self.parse_primary(cursor)?];
        while cursor.peek().0 == Token::Pipe {
            cursor.advance();
            members.push(self.parse_primary(cursor)?);
        }
        Ok(build_union(members))
    }

    fn parse_primary(&self, cursor: &mut Cursor) -> HintResult<TypeHint> {
        let (token, pos) = cursor.advance();
        let name = match token {
            Token::Name(name) => name,
            other => {
                return Err(HintParseError::UnexpectedToken {
                    expected: "a type name".into(),
                    found: other.describe(),
                    pos,
                })
            }
        };

        let args = if cursor.peek().0 == Token::LBracket {
            cursor.advance();
            let mut args = vec![self.parse_union(cursor)?];
            while cursor.peek().0 == Token::Comma {
                cursor.advance();
                args.push(self.parse_union(cursor)?);
            }
            cursor.expect(Token::RBracket, "']'")?;
            Some(args)
        } else {
            None
        };

        self.resolve(&name, args)
    }

    fn resolve(&self, name: &str, args: Option<Vec<TypeHint>>) -> HintResult<TypeHint> {
        let short = name.strip_prefix("typing.").unwrap_or(name);
        match (short, args) {
            ("int", None) => Ok(TypeHint::int()),
            ("str", None) => Ok(TypeHint::str()),
            ("bool", None) => Ok(TypeHint::bool()),
            ("float", None) => Ok(TypeHint::float()),
            ("bytes", None) => Ok(TypeHint::bytes()),
            ("datetime" | "datetime.datetime", None) => Ok(TypeHint::datetime()),
            ("Any", None) => Ok(TypeHint::Any),
            ("None" | "NoneType", None) => Ok(TypeHint::NoneType),
            ("DataFrame" | "pd.DataFrame" | "pandas.DataFrame", None) => Ok(TypeHint::DataFrame),
            ("list" | "List", Some(args)) => {
                let [element] = take_args::<1>(short, args)?;
                Ok(TypeHint::List(Box::new(element)))
            }
            ("dict" | "Dict", Some(args)) => {
                let [key, value] = take_args::<2>(short, args)?;
                Ok(TypeHint::Dict {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            ("Optional", Some(args)) => {
                let [inner] = take_args::<1>(short, args)?;
                Ok(build_union(vec![inner, TypeHint::NoneType]))
            }
            ("Union", Some(args)) => Ok(build_union(args)),
            (_, None) => Ok(self
                .records
                .get(name)
                .map(|def| TypeHint::Record(Arc::clone(def)))
                .unwrap_or_else(|| TypeHint::opaque(name))),
            (_, Some(args)) => {
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                Ok(TypeHint::opaque(format!("{}[{}]", name, rendered.join(", "))))
            }
        }
    }
}

struct Cursor {
    tokens: Vec<(Token, usize)>,
    index: usize,
}

impl Cursor {
    fn peek(&self) -> &(Token, usize) {
        // The token stream always ends with Token::End.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> (Token, usize) {
        let current = self.peek().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        current
    }

    fn expect(&mut self, expected: Token, label: &str) -> HintResult<()> {
        let (token, pos) = self.advance();
        if token == expected {
            Ok(())
        } else {
            Err(HintParseError::UnexpectedToken {
                expected: label.to_string(),
                found: token.describe(),
                pos,
            })
        }
    }
}

fn take_args<const N: usize>(name: &str, args: Vec<TypeHint>) -> HintResult<[TypeHint; N]> {
    let got = args.len();
    args.try_into().map_err(|_| HintParseError::WrongArity {
        name: name.to_string(),
        expected: N.to_string(),
        got,
    })
}

/// Flattens nested unions and drops duplicate members.
fn build_union(members: Vec<TypeHint>) -> TypeHint {
    let mut flat: Vec<TypeHint> = Vec::new();
    for member in members {
        let expanded = match member {
            TypeHint::Union(inner) => inner,
            other => vec![other],
        };
        for hint in expanded {
            if !flat.contains(&hint) {
                flat.push(hint);
            }
        }
    }
    if flat.len() == 1 {
        flat.remove(0)
    } else {
        TypeHint::Union(flat)
    }
}
