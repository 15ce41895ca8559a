// ABOUTME: Extraction strategy ladders for HTML pages and plain-text renderings.
// ABOUTME: Each ladder is an ordered table of pure functions; the first non-empty result wins.

//! Extraction strategies.
//!
//! Submodules:
//! - `structured`: selector-based strategies run against a parsed DOM.
//! - `text`: regex and line-scan strategies for pages without any links.

pub mod structured;
pub mod text;

use tracing::debug;

use crate::article::Article;

/// Runs `ladder` in order and returns the first non-empty result.
pub fn run_ladder<S: Copy>(
    ladder: &[(&'static str, S)],
    mut run: impl FnMut(S) -> Vec<Article>,
) -> Vec<Article> {
    for (name, strategy) in ladder {
        let found = run(*strategy);
        if !found.is_empty() {
            debug!(strategy = *name, articles = found.len(), "strategy matched");
            return found;
        }
        debug!(strategy = *name, "strategy found nothing");
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            link: format!("https://example.com/{}", title),
            summary: String::new(),
            pub_date: String::new(),
        }
    }

    fn nothing() -> Vec<Article> {
        Vec::new()
    }

    fn one() -> Vec<Article> {
        vec![article("a")]
    }

    fn two() -> Vec<Article> {
        vec![article("b"), article("c")]
    }

    type Strategy = fn() -> Vec<Article>;

    #[test]
    fn test_first_non_empty_wins() {
        let ladder: [(&'static str, Strategy); 3] =
            [("empty", nothing), ("first", one), ("second", two)];
        let mut calls = 0;
        let result = run_ladder(&ladder, |s| {
            calls += 1;
            s()
        });
        assert_eq!(result, vec![article("a")]);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_all_empty_yields_empty() {
        let ladder: [(&'static str, Strategy); 2] = [("a", nothing), ("b", nothing)];
        assert!(run_ladder(&ladder, |s| s()).is_empty());
    }
}
