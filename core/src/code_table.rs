use crate::error::{CwError, Result};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// ITU character set: letters, digits and the `. , ? / - =` punctuation
const ITU_CODE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('/', "-..-."),
    ('-', "-....-"),
    ('=', "-...-"),
];

static SHARED: OnceLock<Arc<CodeTable>> = OnceLock::new();

/// One keyed element of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }
}

/// Render symbols as a `.`/`-` string
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}

/// Parse a `.`/`-` string, `None` if it is empty or holds anything else
pub fn parse_symbols(code: &str) -> Option<Vec<Symbol>> {
    if code.is_empty() {
        return None;
    }
    code.chars().map(Symbol::from_char).collect()
}

/// Immutable bidirectional mapping between characters and symbol sequences
///
/// Every character maps to a unique, non-empty sequence so that reverse
/// lookup is unambiguous. Space is never a table entry; it is the word
/// separator.
#[derive(Debug, Clone)]
pub struct CodeTable {
    forward: HashMap<char, Vec<Symbol>>,
    reverse: HashMap<Vec<Symbol>, char>,
}

impl CodeTable {
    /// Standard ITU table
    pub fn itu() -> Self {
        // The built-in entries satisfy every invariant checked below
        Self::from_entries(ITU_CODE).unwrap_or_else(|e| unreachable!("{}", e))
    }

    /// Process-wide ITU table, built on first use
    pub fn shared() -> Arc<CodeTable> {
        SHARED.get_or_init(|| Arc::new(Self::itu())).clone()
    }

    /// Build a table from `(character, code)` pairs
    ///
    /// Fails if a character is whitespace or lowercase, a code is empty or
    /// holds anything but `.`/`-`, or either side repeats.
    pub fn from_entries(entries: &[(char, &str)]) -> Result<Self> {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut reverse = HashMap::with_capacity(entries.len());

        for &(c, code) in entries {
            if c.is_whitespace() {
                return Err(CwError::InvalidCodeTable(
                    "whitespace is reserved as the word separator".to_string(),
                ));
            }
            if c.is_lowercase() {
                return Err(CwError::InvalidCodeTable(format!(
                    "'{}' must be uppercase",
                    c
                )));
            }

            let symbols = parse_symbols(code).ok_or_else(|| {
                CwError::InvalidCodeTable(format!("'{}' has invalid code {:?}", c, code))
            })?;

            if forward.insert(c, symbols.clone()).is_some() {
                return Err(CwError::InvalidCodeTable(format!(
                    "'{}' appears more than once",
                    c
                )));
            }
            if let Some(other) = reverse.insert(symbols, c) {
                return Err(CwError::InvalidCodeTable(format!(
                    "'{}' and '{}' share code {}",
                    other, c, code
                )));
            }
        }

        Ok(Self { forward, reverse })
    }

    /// Symbols for a character, matched case-insensitively for ASCII letters
    pub fn code_for(&self, c: char) -> Option<&[Symbol]> {
        self.forward
            .get(&c.to_ascii_uppercase())
            .map(|symbols| symbols.as_slice())
    }

    pub fn char_for(&self, symbols: &[Symbol]) -> Option<char> {
        self.reverse.get(symbols).copied()
    }

    /// Reverse lookup of a `.`/`-` group
    pub fn char_for_code(&self, code: &str) -> Option<char> {
        parse_symbols(code).and_then(|symbols| self.char_for(&symbols))
    }

    pub fn contains(&self, c: char) -> bool {
        self.code_for(c).is_some()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (char, &[Symbol])> {
        self.forward.iter().map(|(&c, s)| (c, s.as_slice()))
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::itu()
    }
}
