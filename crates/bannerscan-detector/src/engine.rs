//! DOM capability used by the matcher.
//!
//! A [`DomEngine`] parses markup into a document and evaluates CSS selectors
//! against it. [`ScraperEngine`] is the default implementation, backed by
//! html5ever and the `selectors` crate through `scraper`.

use crate::error::{DetectError, Result};
use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;

/// Stable identity of an element within one parsed document.
///
/// Two handles from the same document are equal exactly when they refer to
/// the same element, regardless of the element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Wrap an engine-specific node index or address.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }
}

/// What the matcher needs to know about one selected element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Per-parse identity
    pub handle: NodeHandle,
    /// Lower-cased tag name
    pub tag: String,
    /// `id` attribute, empty if absent
    pub id: String,
    /// Concatenated text content, trimmed at both ends
    pub text: String,
}

/// A selector the engine cannot evaluate.
#[derive(Debug, Clone, Error)]
#[error("invalid selector {selector:?}: {reason}")]
pub struct SelectorError {
    /// The offending selector
    pub selector: String,
    /// Engine-provided reason
    pub reason: String,
}

/// Parse documents and evaluate selectors against them.
pub trait DomEngine {
    /// Parsed document type.
    type Document;

    /// Parse markup into a document.
    ///
    /// # Errors
    /// Returns [`DetectError::Parse`] when the input has no usable structure.
    fn parse(&self, html: &str) -> Result<Self::Document>;

    /// Elements matching `selector`, in document order, for which `claim`
    /// returns `true`.
    ///
    /// `claim` sees each match's handle before the element is snapshotted,
    /// so rejected elements never have their text collected.
    ///
    /// # Errors
    /// Returns [`SelectorError`] when `selector` is not valid for this engine.
    fn select_claimed(
        &self,
        document: &Self::Document,
        selector: &str,
        claim: &mut dyn FnMut(NodeHandle) -> bool,
    ) -> std::result::Result<Vec<ElementSnapshot>, SelectorError>;

    /// All elements matching `selector`, in document order.
    ///
    /// # Errors
    /// Returns [`SelectorError`] when `selector` is not valid for this engine.
    fn select(
        &self,
        document: &Self::Document,
        selector: &str,
    ) -> std::result::Result<Vec<ElementSnapshot>, SelectorError> {
        self.select_claimed(document, selector, &mut |_| true)
    }
}

/// [`DomEngine`] backed by `scraper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperEngine;

impl DomEngine for ScraperEngine {
    type Document = Html;

    fn parse(&self, html: &str) -> Result<Html> {
        if html.trim().is_empty() {
            return Err(DetectError::Parse("document is empty".to_string()));
        }

        let document = Html::parse_document(html);

        if !has_content(&document) {
            return Err(DetectError::Parse(
                "document has no elements or text".to_string(),
            ));
        }

        Ok(document)
    }

    fn select_claimed(
        &self,
        document: &Html,
        selector: &str,
        claim: &mut dyn FnMut(NodeHandle) -> bool,
    ) -> std::result::Result<Vec<ElementSnapshot>, SelectorError> {
        let parsed = Selector::parse(selector).map_err(|e| SelectorError {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;

        Ok(document
            .select(&parsed)
            .filter(|element| claim(handle_of(*element)))
            .map(snapshot)
            .collect())
    }
}

/// Whether the parser found anything beyond the implied `html`/`head`/`body`.
fn has_content(document: &Html) -> bool {
    document
        .root_element()
        .descendants()
        .any(|node| match node.value() {
            Node::Element(element) => !matches!(element.name(), "html" | "head" | "body"),
            Node::Text(text) => !text.trim().is_empty(),
            _ => false,
        })
}

// Elements live in the document's node arena, so the address is unique and
// stable for as long as the document is borrowed.
fn handle_of(element: ElementRef<'_>) -> NodeHandle {
    NodeHandle::new(std::ptr::from_ref(element.value()) as usize)
}

fn snapshot(element: ElementRef<'_>) -> ElementSnapshot {
    let value = element.value();

    ElementSnapshot {
        handle: handle_of(element),
        tag: value.name().to_lowercase(),
        id: value.id().unwrap_or_default().to_string(),
        text: element.text().collect::<String>().trim().to_string(),
    }
}
