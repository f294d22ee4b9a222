use crate::code_table::{symbols_to_string, CodeTable};
use crate::{PLACEHOLDER, WORD_SEPARATOR};
use std::sync::Arc;

/// Result of an encode that also reports what was lost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub code: String,
    /// Input characters with no table entry, in input order
    pub dropped: Vec<char>,
}

/// Stateless text <-> code conversion
///
/// Code strings put one space between character groups and stand a
/// lone `/` group for every space in the text, so `"HI YOU"` becomes
/// `".... .. / -.-- --- ..-"`.
#[derive(Debug, Clone)]
pub struct Translator {
    table: Arc<CodeTable>,
}

impl Translator {
    pub fn new(table: Arc<CodeTable>) -> Self {
        Self { table }
    }

    /// Convert text to code, silently dropping unsupported characters
    pub fn encode(&self, text: &str) -> String {
        self.encode_reporting(text).code
    }

    /// Same output as [`Translator::encode`], plus the dropped characters
    pub fn encode_reporting(&self, text: &str) -> Encoded {
        let mut groups: Vec<String> = Vec::new();
        let mut dropped = Vec::new();

        for c in text.to_uppercase().chars() {
            if c == ' ' {
                groups.push(WORD_SEPARATOR.to_string());
            } else if let Some(symbols) = self.table.code_for(c) {
                groups.push(symbols_to_string(symbols));
            } else {
                dropped.push(c);
            }
        }

        if !dropped.is_empty() {
            log::debug!("dropped {} unsupported character(s): {:?}", dropped.len(), dropped);
        }

        Encoded {
            code: groups.join(" "),
            dropped,
        }
    }

    /// Convert code back to text
    ///
    /// Words are split on `" / "`, groups on single spaces. A non-empty group
    /// with no table entry becomes `?`; empty groups are skipped.
    pub fn decode(&self, code: &str) -> String {
        let separator = format!(" {} ", WORD_SEPARATOR);

        code.split(separator.as_str())
            .map(|word| {
                word.split(' ')
                    .filter(|group| !group.is_empty())
                    .map(|group| {
                        self.table.char_for_code(group).unwrap_or_else(|| {
                            log::debug!("unrecognized code group {:?}", group);
                            PLACEHOLDER
                        })
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(CodeTable::shared())
    }
}

/// Encode text with the shared ITU table
pub fn text_to_code(text: &str) -> String {
    Translator::default().encode(text)
}

/// Decode code with the shared ITU table
pub fn code_to_text(code: &str) -> String {
    Translator::default().decode(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_hello() {
        assert_eq!(text_to_code("HELLO"), ".... . .-.. .-.. ---");
    }

    #[test]
    fn test_encode_known_words() {
        assert_eq!(text_to_code("SOS"), "... --- ...");
        assert_eq!(text_to_code("CQ"), "-.-. --.-");
        assert_eq!(text_to_code("73"), "--... ...--");
    }

    #[test]
    fn test_encode_is_case_insensitive() {
        assert_eq!(text_to_code("sos"), text_to_code("SOS"));
    }

    #[test]
    fn test_encode_space_becomes_separator() {
        assert_eq!(text_to_code("E E"), ". / .");
        assert_eq!(text_to_code(" "), "/");
    }

    #[test]
    fn test_encode_drops_unsupported() {
        assert_eq!(text_to_code("S#O@S"), "... --- ...");
        assert_eq!(text_to_code("!!!"), "");
        assert_eq!(text_to_code(""), "");
    }

    #[test]
    fn test_encode_reporting_lists_dropped() {
        let translator = Translator::default();
        let encoded = translator.encode_reporting("hi! ok#");
        assert_eq!(encoded.code, ".... .. / --- -.-");
        assert_eq!(encoded.dropped, vec!['!', '#']);
        assert_eq!(encoded.code, translator.encode("hi! ok#"));
    }

    #[test]
    fn test_decode_sos() {
        assert_eq!(code_to_text("... --- ..."), "SOS");
    }

    #[test]
    fn test_decode_words() {
        assert_eq!(code_to_text(".... .. / -.-- --- ..-"), "HI YOU");
    }

    #[test]
    fn test_decode_unknown_group_is_placeholder() {
        assert_eq!(code_to_text("... ...... ..."), "S?S");
        assert_eq!(code_to_text(".-x"), "?");
    }

    #[test]
    fn test_decode_skips_empty_groups() {
        assert_eq!(code_to_text("...  ---"), "SO");
        assert_eq!(code_to_text(""), "");
    }

    #[test]
    fn test_slash_character_survives() {
        // '/' as a character is -..-. and must not be read as a word break
        assert_eq!(text_to_code("A/B"), ".- -..-. -...");
        assert_eq!(code_to_text(".- -..-. -..."), "A/B");
    }

    #[test]
    fn test_hello_world_round_trip() {
        let code = text_to_code("HELLO WORLD");
        assert_eq!(code_to_text(&code), "HELLO WORLD");
    }
}
