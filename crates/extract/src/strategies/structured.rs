// ABOUTME: Selector-based strategies that recover article links from a parsed HTML page.
// ABOUTME: Site layout first, then list-like containers, then a filtered whole-page anchor scan.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::article::{Article, ArticleBuilder};
use crate::dom::{attr, has_any_class, select_first_within, select_within, visible_text, PageDom};

/// A strategy run against a parsed page.
pub type StructuredStrategy = fn(&PageDom, &ArticleBuilder) -> Vec<Article>;

/// Strategies in priority order.
pub const STRUCTURED_STRATEGIES: &[(&str, StructuredStrategy)] = &[
    ("site-layout", site_layout),
    ("list-containers", list_containers),
    ("whole-page", whole_page),
];

/// The "new articles" list on the site's own markup.
const SITE_LIST: &str = "div.new-content div.new-list ul";
const SITE_TITLE_ANCHOR: &str = "div.new-title a";
const SITE_SUMMARY: &str = ".new-desc, .desc, p";

/// Container selector families, tried in order.
const LIST_CONTAINERS: &[&str] = &[
    "div[class*=list]",
    "section[class*=list]",
    "div[class*=recommend]",
    "section[class*=recommend]",
];

/// Anchor classes that mark navigation rather than content.
const NAV_CLASSES: &[&str] = &["pagination", "pager", "nav", "breadcrumb"];

/// Anchor text longer than this is accepted as a probable headline.
const HEADLINE_MIN_CHARS: usize = 10;

static ARTICLE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)/(mp|article|news)/").unwrap());
static LOOSE_ARTICLE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/(mp|article|news|a\d+)/").unwrap());
static HTML_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.html?$").unwrap());

/// Site-specific layout: one article per item of the "new articles" list.
pub fn site_layout(dom: &PageDom, builder: &ArticleBuilder) -> Vec<Article> {
    let Some(list) = dom.select_first(SITE_LIST) else {
        return Vec::new();
    };
    debug!(selector = SITE_LIST, "found site article list");

    select_within(list, "li")
        .into_iter()
        .filter_map(|item| {
            let anchor = select_first_within(item, SITE_TITLE_ANCHOR)
                .or_else(|| select_first_within(item, "a"))?;
            let summary = select_first_within(item, SITE_SUMMARY)
                .map(visible_text)
                .unwrap_or_default();
            builder.build(&visible_text(anchor), attr(anchor, "href"), &summary)
        })
        .collect()
}

/// Generic list containers: anchors with article-like paths inside elements
/// whose class mentions "list" or "recommend". The first container that
/// yields anything wins.
pub fn list_containers(dom: &PageDom, builder: &ArticleBuilder) -> Vec<Article> {
    for css in LIST_CONTAINERS {
        let containers = dom.select(css);
        debug!(selector = *css, containers = containers.len(), "scanning list containers");

        for container in containers {
            let found: Vec<Article> = select_within(container, "a[href]")
                .into_iter()
                .filter_map(|anchor| {
                    let href = attr(anchor, "href");
                    let text = visible_text(anchor);
                    if href.is_empty() || text.is_empty() || !ARTICLE_PATH.is_match(href) {
                        return None;
                    }
                    builder.build(&text, href, "")
                })
                .collect();
            if !found.is_empty() {
                return found;
            }
        }
    }
    Vec::new()
}

/// Whole-page fallback over every anchor, deduplicated by (text, absolute link).
pub fn whole_page(dom: &PageDom, builder: &ArticleBuilder) -> Vec<Article> {
    let candidates: Vec<(String, &str)> = dom
        .anchors()
        .into_iter()
        .filter_map(|anchor| {
            let href = attr(anchor, "href");
            let text = visible_text(anchor);
            if href.is_empty() || text.is_empty() {
                return None;
            }
            if !looks_like_article(&text, href) || has_any_class(anchor, NAV_CLASSES) {
                return None;
            }
            Some((text, href))
        })
        .collect();
    debug!(candidates = candidates.len(), "whole-page candidates");

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|(text, href)| {
            let link = builder.resolve(href)?;
            if !seen.insert((text.clone(), link)) {
                return None;
            }
            builder.build(&text, href, "")
        })
        .collect()
}

/// Loose acceptance rule for the whole-page scan.
pub fn looks_like_article(text: &str, href: &str) -> bool {
    LOOSE_ARTICLE_PATH.is_match(href)
        || HTML_SUFFIX.is_match(href)
        || text.chars().count() > HEADLINE_MIN_CHARS
}
