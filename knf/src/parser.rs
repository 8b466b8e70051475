//! # KNF Parser
//!
//! Line-oriented parser for the KNF configuration format: `[section]`
//! headers, `name: value` properties, `#` comments and `{section:property}`
//! macro expansion.
//!
//! Parsing is atomic: either a fully populated store is produced or an
//! error carrying the 1-based line number is returned. A partially parsed
//! store is never exposed.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{SECTION_MARKER, Store, normalize_name};

/// Matches a brace-delimited token; whether the body is a macro reference
/// is decided by the property-name shape check.
static MACRO_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]+\}").expect("macro token pattern"));

/// KNF syntax error. Every variant except [`ParseError::NoData`] carries
/// the 1-based line number it was raised at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Error at line {line}: Data defined before section")]
    DataBeforeSection { line: usize },

    #[error("Error at line {line}: Property must have ':' as a delimiter")]
    MissingDelimiter { line: usize },

    #[error("Error at line {line}: Property {name:?} defined more than once")]
    DuplicateProperty { line: usize, name: String },

    #[error("Error at line {line}: Unknown property {token}")]
    UnknownMacro { line: usize, token: String },

    #[error("Configuration file doesn't contain any valid data")]
    NoData,
}

/// Parses complete KNF text into a store.
pub(crate) fn parse_text(text: &str) -> Result<Store, ParseError> {
    let mut store = Store::default();
    let mut section = String::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim_matches([' ', '\t']);

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            section = trimmed[1..trimmed.len() - 1].to_string();
            let key = section.to_lowercase();

            // first appearance wins: a reopened section keeps its original
            // slot in the ordered list
            if !store.data.contains_key(&key) {
                store.sections.push(section.clone());
                store.data.insert(key, SECTION_MARKER.to_string());
            }

            continue;
        }

        if section.is_empty() {
            return Err(ParseError::DataBeforeSection { line });
        }

        let Some((name, value)) = trimmed.split_once(':') else {
            return Err(ParseError::MissingDelimiter { line });
        };

        let name = name.trim();
        let value = value.trim();
        let key = format!("{}:{}", section.to_lowercase(), name.to_lowercase());

        if store.data.contains_key(&key) {
            return Err(ParseError::DuplicateProperty {
                line,
                name: name.to_string(),
            });
        }

        let value = if value.contains('{') || value.contains('}') {
            expand_macros(value, &store.data, line)?
        } else {
            value.to_string()
        };

        store.props.push(format!("{section}:{name}"));
        store.data.insert(key, value);
    }

    if store.sections.is_empty() {
        return Err(ParseError::NoData);
    }

    Ok(store)
}

/// Substitutes `{section:property}` references against previously-parsed
/// properties. Tokens whose body does not match the property-name shape
/// are left literal; well-formed tokens that fail to resolve abort the
/// parse.
fn expand_macros(
    value: &str,
    data: &HashMap<String, String>,
    line: usize,
) -> Result<String, ParseError> {
    let mut out = String::with_capacity(value.len());
    let mut tail = 0;

    for token in MACRO_TOKEN.find_iter(value) {
        out.push_str(&value[tail..token.start()]);
        tail = token.end();

        let body = &token.as_str()[1..token.as_str().len() - 1];

        match normalize_name(body) {
            Some(key) => match data.get(&key) {
                Some(resolved) if resolved != SECTION_MARKER => out.push_str(resolved),
                _ => {
                    return Err(ParseError::UnknownMacro {
                        line,
                        token: token.as_str().to_string(),
                    });
                }
            },
            None => out.push_str(token.as_str()),
        }
    }

    out.push_str(&value[tail..]);

    Ok(out)
}
