//! Markup locator
//!
//! Read-only lookups over a parsed document. Paths are CSS selectors
//! (`div.a > p.b`, `[class*=...]` for substring class matches); the one
//! thing CSS cannot express, a text-equality predicate on a label element,
//! is covered by [`locate_labeled`] and [`value_after_label`].
//!
//! Every lookup returns `Option`/`Vec`, so a missing or reshaped block is an
//! absence the caller decides about, never a panic.

use scraper::node::Node;
use scraper::{ElementRef, Selector};

/// Returns the first descendant of `scope` matching `selector`
pub fn locate<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Returns every descendant of `scope` matching `selector`, in document order
pub fn locate_all<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}

/// Finds the first element matching `selector` whose trimmed text equals `label`
///
/// # Example
///
/// ```
/// use lodestone_scrape::locate::locate_labeled;
/// use scraper::{Html, Selector};
///
/// let html = Html::parse_fragment("<h3>Rank</h3><h3>Formed</h3>");
/// let heading = Selector::parse("h3").unwrap();
/// let found = locate_labeled(html.root_element(), &heading, "Formed").unwrap();
/// assert_eq!(found.text().collect::<String>(), "Formed");
/// ```
pub fn locate_labeled<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    label: &str,
) -> Option<ElementRef<'a>> {
    scope
        .select(selector)
        .find(|element| element.text().collect::<String>().trim() == label)
}

/// Finds a labeled heading and returns the element that immediately follows it
///
/// This is the "label precedes value" layout used all over the Lodestone:
///
/// ```html
/// <h3 class="heading--lead">Rank</h3>
/// <p class="freecompany__text">8</p>
/// ```
pub fn value_after_label<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    label: &str,
) -> Option<ElementRef<'a>> {
    locate_labeled(scope, selector, label).and_then(next_element)
}

/// Returns the next sibling that is an element, skipping text and comments
pub fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Returns the parent element, if the parent is an element
pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Iterates over the direct child elements of `element`
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap)
}

/// Returns the `n`th (zero-based) direct child element
pub fn nth_child_element(element: ElementRef<'_>, n: usize) -> Option<ElementRef<'_>> {
    child_elements(element).nth(n)
}

/// Reads an attribute value
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Text directly inside `element` that precedes its first child element
///
/// For `<p>Hyur<br>Midlander / ♂</p>` this is `"Hyur"`.
pub fn own_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.children() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => break,
            _ => {}
        }
    }
    out
}

/// Text that follows `element` inside its parent, up to the next sibling element
///
/// For the `<br>` in `<p>Hyur<br>Midlander / ♂</p>` this is `"Midlander / ♂"`.
pub fn tail_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.next_siblings() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => break,
            _ => {}
        }
    }
    out
}

/// Full text content with `<br>` rendered as a newline
pub fn multiline_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}
