//! Identifier resolution.
//!
//! Turns user input (a `publisher.extension` pair or a marketplace item URL
//! such as `https://marketplace.visualstudio.com/items?itemName=ms-python.python`)
//! into an [`ExtensionRef`].

use crate::gallery::is_path_segment;
use std::fmt;
use std::str::FromStr;

/// Publisher/extension pair identifying one marketplace item.
///
/// Both parts pass [`is_path_segment`], so they can be used directly as URL
/// path segments and in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionRef {
    publisher: String,
    extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("could not parse publisher and extension from {input:?}; use 'publisher.extension' or a marketplace URL")]
    Malformed { input: String },
    #[error("marketplace URL has no itemName=<publisher>.<extension> parameter: {url}")]
    MissingItemName { url: String },
    #[error("invalid marketplace URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{field} {value:?} contains characters not allowed in a marketplace name (whitespace, control characters, '/', '\\', '?', '#' or '%')")]
    InvalidCharacters { field: &'static str, value: String },
}

impl ExtensionRef {
    pub fn new(
        publisher: impl Into<String>,
        extension: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let publisher = publisher.into();
        let extension = extension.into();
        if publisher.is_empty() || extension.is_empty() {
            return Err(IdentifierError::Malformed {
                input: format!("{}.{}", publisher, extension),
            });
        }
        check_segment("publisher", &publisher)?;
        check_segment("extension", &extension)?;
        Ok(Self {
            publisher,
            extension,
        })
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl fmt::Display for ExtensionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.publisher, self.extension)
    }
}

impl FromStr for ExtensionRef {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_identifier(s)
    }
}

fn check_segment(field: &'static str, value: &str) -> Result<(), IdentifierError> {
    if !is_path_segment(value) {
        return Err(IdentifierError::InvalidCharacters {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Parses a `publisher.extension` string or a marketplace item URL.
///
/// The publisher is everything before the first `.`, the extension everything
/// after it, so `ms-vscode.cpptools.nightly` yields extension `cpptools.nightly`.
pub fn parse_identifier(input: &str) -> Result<ExtensionRef, IdentifierError> {
    let input = input.trim();
    if is_url(input) {
        return parse_item_url(input);
    }
    let (publisher, extension) =
        split_item_name(input).ok_or_else(|| IdentifierError::Malformed {
            input: input.to_string(),
        })?;
    ExtensionRef::new(publisher, extension)
}

fn is_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn parse_item_url(input: &str) -> Result<ExtensionRef, IdentifierError> {
    let url = url::Url::parse(input).map_err(|e| IdentifierError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;
    // query_pairs splits on '&' and percent-decodes, so the value ends at the next '&'.
    let item_name = url
        .query_pairs()
        .find(|(key, _)| key == "itemName")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| IdentifierError::MissingItemName {
            url: input.to_string(),
        })?;
    let (publisher, extension) =
        split_item_name(&item_name).ok_or_else(|| IdentifierError::MissingItemName {
            url: input.to_string(),
        })?;
    ExtensionRef::new(publisher, extension)
}

fn split_item_name(item_name: &str) -> Option<(&str, &str)> {
    let (publisher, extension) = item_name.split_once('.')?;
    if publisher.is_empty() || extension.is_empty() {
        return None;
    }
    Some((publisher, extension))
}
