//! Small helpers over `scraper` element trees shared by the extractors.

use scraper::{ElementRef, Selector};

/// Parse a selector that is known to be valid at compile time.
///
/// An invalid selector matches nothing and is logged once per call.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!(css, "invalid selector: {e:?}");
            None
        }
    }
}

/// Every element under `root` matching `css`, in document order.
pub(crate) fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    selector(css)
        .map(|sel| root.select(&sel).collect())
        .unwrap_or_default()
}

/// The first element under `root` matching `css`.
pub(crate) fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    root.select(&sel).next()
}

/// Whether anything under `root` matches `css`.
pub(crate) fn contains(root: ElementRef<'_>, css: &str) -> bool {
    select_first(root, css).is_some()
}

/// Stripped text nodes of `root` joined by `separator`.
///
/// Text inside any of the `excluded` elements is skipped, and whitespace-only
/// nodes are dropped.
pub(crate) fn joined_text(root: ElementRef<'_>, separator: &str, excluded: &[ElementRef<'_>]) -> String {
    text_nodes(root, excluded)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Raw text of `root`, concatenated without separators and trimmed.
pub(crate) fn raw_text(root: ElementRef<'_>) -> String {
    visible_text(root, &[])
}

/// Like [`raw_text`], but text inside any of the `excluded` elements is
/// skipped.
pub(crate) fn visible_text(root: ElementRef<'_>, excluded: &[ElementRef<'_>]) -> String {
    text_nodes(root, excluded).collect::<String>().trim().to_owned()
}

/// Text nodes under `root` outside every `excluded` subtree, in document order.
fn text_nodes<'a, 'b>(
    root: ElementRef<'a>,
    excluded: &'b [ElementRef<'b>],
) -> impl Iterator<Item = &'a str> + 'b
where
    'a: 'b,
{
    root.descendants().filter_map(move |node| {
        let text = node.value().as_text()?;
        let hidden = node
            .ancestors()
            .any(|ancestor| excluded.iter().any(|ex| ex.id() == ancestor.id()));
        (!hidden).then_some(&**text)
    })
}

/// The `href` of `element`, if present and non-empty.
pub(crate) fn href(element: ElementRef<'_>) -> Option<&str> {
    element.value().attr("href").filter(|h| !h.trim().is_empty())
}
