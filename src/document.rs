//! Conversion between stanza trees and their stored text form.

use minidom::Element;
use thiserror::Error;

/// A document could not be rendered or parsed.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The XML is malformed or lacks a namespace on its root.
    #[error("malformed document: {0}")]
    Xml(#[from] minidom::Error),

    /// The rendered bytes are not UTF-8.
    #[error("document is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Renders `element` as an XML string, namespace declarations included.
///
/// # Errors
///
/// Returns [`DocumentError`] when the writer fails.
pub fn render(element: &Element) -> Result<String, DocumentError> {
    let mut buffer = Vec::new();
    element.write_to(&mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Parses a stored XML string.
///
/// # Errors
///
/// Returns [`DocumentError::Xml`] when `xml` is not a well-formed,
/// namespaced document.
pub fn parse(xml: &str) -> Result<Element, DocumentError> {
    Ok(xml.parse::<Element>()?)
}
