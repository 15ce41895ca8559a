// ABOUTME: Line-scan and regex strategies for pages that arrive as plain text or markdown.
// ABOUTME: Markdown links first, then URLs inline with their headline, then marker-word proximity.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::article::{Article, ArticleBuilder};
use crate::profile::SiteProfile;

/// A strategy run against raw page text.
pub type TextStrategy = fn(&str, &ArticleBuilder, &SiteProfile) -> Vec<Article>;

/// Strategies in priority order.
pub const TEXT_STRATEGIES: &[(&str, TextStrategy)] = &[
    ("markdown-links", markdown_links),
    ("inline-urls", inline_urls),
    ("marker-proximity", marker_proximity),
];

/// Inline titles must be longer than this.
const INLINE_TITLE_MIN_CHARS: usize = 5;
/// Marker lines and headline lines must be longer than this.
const PROXIMITY_LINE_MIN_CHARS: usize = 10;
/// How many lines above a marker line may hold its headline.
const PROXIMITY_LOOKBACK: usize = 3;

static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// `[title](url)` links whose URL points at the site's article section.
pub fn markdown_links(text: &str, builder: &ArticleBuilder, profile: &SiteProfile) -> Vec<Article> {
    MARKDOWN_LINK
        .captures_iter(text)
        .filter_map(|caps| {
            let title = caps.get(1)?.as_str();
            let link = caps.get(2)?.as_str();
            if !link.contains(profile.link_marker.as_str()) || title.trim().is_empty() {
                return None;
            }
            builder.build(title, link, "")
        })
        .collect()
}

/// Lines of the form `<headline> <article url>`.
pub fn inline_urls(text: &str, builder: &ArticleBuilder, profile: &SiteProfile) -> Vec<Article> {
    text.lines()
        .filter(|line| line.contains(profile.article_url_prefix.as_str()))
        .filter_map(|line| {
            let found = profile.article_url.find(line)?;
            let title = line[..found.start()].trim();
            if title.chars().count() <= INLINE_TITLE_MIN_CHARS {
                return None;
            }
            builder.build(title, found.as_str(), "")
        })
        .collect()
}

/// Headlines found just above lines carrying list metadata ("original",
/// "views"). The nearest qualifying line that carries an article URL wins.
pub fn marker_proximity(
    text: &str,
    builder: &ArticleBuilder,
    profile: &SiteProfile,
) -> Vec<Article> {
    let lines: Vec<&str> = text.lines().collect();
    let mut articles = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !profile.has_marker(line) || line.trim().chars().count() <= PROXIMITY_LINE_MIN_CHARS {
            continue;
        }
        for prev in lines[i.saturating_sub(PROXIMITY_LOOKBACK)..i].iter().rev() {
            let prev = prev.trim();
            if prev.chars().count() <= PROXIMITY_LINE_MIN_CHARS || prev.starts_with("http") {
                continue;
            }
            let Some(found) = profile.article_url.find(prev) else {
                continue;
            };
            let link = found.as_str();
            let title = prev.replace(link, "");
            if let Some(article) = builder.build(&title, link, "") {
                articles.push(article);
                break;
            }
        }
    }
    articles
}
