// ABOUTME: Small DOM query capability over scraper used by the structured extraction strategies.
// ABOUTME: Caches compiled CSS selectors and exposes text, attribute and class helpers.

//! DOM query helpers.
//!
//! Strategies never talk to `scraper` directly; they go through [`PageDom`]
//! and the element helpers here. Selector strings are compiled once and
//! cached for the life of the process. An invalid selector matches nothing.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result (including failures).
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(css.to_string())
        .or_insert_with(|| compiled.clone());
    compiled
}

/// A parsed page.
pub struct PageDom {
    html: Html,
}

impl PageDom {
    /// Parses `content` as an HTML document. Never fails; malformed markup is
    /// repaired by the parser.
    pub fn parse(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
        }
    }

    /// All elements matching `css`, in document order.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match get_or_compile(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching `css`.
    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = get_or_compile(css)?;
        let first = self.html.select(&selector).next();
        first
    }

    /// Number of `<a>` elements anywhere in the document, with or without href.
    pub fn anchor_count(&self) -> usize {
        self.select("a").len()
    }

    /// All anchors carrying an `href` attribute.
    pub fn anchors(&self) -> Vec<ElementRef<'_>> {
        self.select("a[href]")
    }

    /// Text of the `<title>` element, if any.
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .map(visible_text)
            .filter(|t| !t.is_empty())
    }
}

/// Descendants of `el` matching `css`.
pub fn select_within<'a>(el: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match get_or_compile(css) {
        Some(selector) => el.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// First descendant of `el` matching `css`.
pub fn select_first_within<'a>(el: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = get_or_compile(css)?;
    let first = el.select(&selector).next();
    first
}

/// Visible text of an element: every text node trimmed, then concatenated.
pub fn visible_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// Attribute value, or `""` when missing.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> &'a str {
    el.value().attr(name).unwrap_or("")
}

/// True if any of the element's class tokens equals one of `names`.
pub fn has_any_class(el: ElementRef<'_>, names: &[&str]) -> bool {
    el.value().classes().any(|c| names.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <html>
        <head><title> Sample   Page </title></head>
        <body>
            <div class="news-list">
                <a href="/mp/a1.html"> First <b>story</b> </a>
                <a class="pager next" href="?page=2">Next</a>
                <a>no href</a>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_selector_cache() {
        assert!(get_or_compile("div.container").is_some());
        assert!(get_or_compile("div.container").is_some());
        assert!(get_or_compile("[[[invalid").is_none());
        assert!(get_or_compile("[[[invalid").is_none());
    }

    #[test]
    fn test_anchor_counts() {
        let dom = PageDom::parse(SAMPLE_HTML);
        assert_eq!(dom.anchor_count(), 3);
        assert_eq!(dom.anchors().len(), 2);
    }

    #[test]
    fn test_visible_text_strips_each_fragment() {
        let dom = PageDom::parse(SAMPLE_HTML);
        let first = dom.anchors()[0];
        assert_eq!(visible_text(first), "Firststory");
        assert_eq!(dom.title().as_deref(), Some("Sample   Page"));
    }

    #[test]
    fn test_class_substring_selector() {
        let dom = PageDom::parse(SAMPLE_HTML);
        let containers = dom.select("div[class*=list]");
        assert_eq!(containers.len(), 1);
        assert_eq!(select_within(containers[0], "a[href]").len(), 2);
    }

    #[test]
    fn test_has_any_class_matches_whole_tokens() {
        let dom = PageDom::parse(SAMPLE_HTML);
        let anchors = dom.anchors();
        assert!(!has_any_class(anchors[0], &["pager"]));
        assert!(has_any_class(anchors[1], &["pager"]));
        assert!(!has_any_class(anchors[1], &["page"]));
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let dom = PageDom::parse(SAMPLE_HTML);
        assert!(dom.select("[[[invalid").is_empty());
        assert!(dom.select_first("[[[invalid").is_none());
    }

    #[test]
    fn test_attr_missing_is_empty() {
        let dom = PageDom::parse(SAMPLE_HTML);
        let bare = dom.select("a")[2];
        assert_eq!(attr(bare, "href"), "");
    }
}
