// ABOUTME: ArticleExtractor orchestrates parsing and the strategy ladders for one page.
// ABOUTME: Pages without any links go to the text heuristics; others go through the DOM strategies.

use tracing::{debug, info};

use crate::article::{Article, ArticleBuilder};
use crate::clock::{Clock, SystemClock};
use crate::dom::{attr, visible_text, PageDom};
use crate::profile::SiteProfile;
use crate::strategies::run_ladder;
use crate::strategies::structured::STRUCTURED_STRATEGIES;
use crate::strategies::text::TEXT_STRATEGIES;

/// How many links are echoed to the debug log.
const LOGGED_LINKS: usize = 10;

/// Extracts article records from a fetched page.
///
/// Extraction never fails: markup the strategies do not recognise simply
/// yields fewer (or zero) articles.
pub struct ArticleExtractor {
    profile: SiteProfile,
    clock: Box<dyn Clock>,
}

impl ArticleExtractor {
    /// Extractor with the default site profile and the system clock.
    pub fn new() -> Self {
        Self {
            profile: SiteProfile::default(),
            clock: Box::new(SystemClock),
        }
    }

    /// Use a different site profile for the text heuristics.
    pub fn with_profile(mut self, profile: SiteProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Use a different clock for article timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Extracts articles from `page`, resolving links against `base_url`.
    pub fn extract(&self, page: &str, base_url: &str) -> Vec<Article> {
        let builder = ArticleBuilder::new(base_url, self.clock.as_ref());
        let dom = PageDom::parse(page);

        let title = dom.title();
        debug!(title = title.as_deref().unwrap_or("(none)"), "parsed page");
        let anchors = dom.anchor_count();
        debug!(anchors, "counted links");

        if anchors == 0 {
            info!("page has no links, parsing it as plain text");
            return extract_text(page, &builder, &self.profile);
        }

        for (i, anchor) in dom.anchors().into_iter().take(LOGGED_LINKS).enumerate() {
            let text: String = visible_text(anchor).chars().take(50).collect();
            debug!("  {}. {} -> {}", i + 1, text, attr(anchor, "href"));
        }

        run_ladder(STRUCTURED_STRATEGIES, |strategy| strategy(&dom, &builder))
    }

    /// Runs only the text heuristics against `text`.
    pub fn extract_from_text(&self, text: &str, base_url: &str) -> Vec<Article> {
        let builder = ArticleBuilder::new(base_url, self.clock.as_ref());
        extract_text(text, &builder, &self.profile)
    }
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_text(text: &str, builder: &ArticleBuilder, profile: &SiteProfile) -> Vec<Article> {
    run_ladder(TEXT_STRATEGIES, |strategy| strategy(text, builder, profile))
}
