//! One scrape pass over the front page.
//!
//! A cycle fetches the front page, enumerates candidate article teasers,
//! filters out already-seen URLs, then fetches and extracts the remainder
//! strictly sequentially. Failure policy: the front page failing aborts the
//! cycle (there is nothing to iterate over); a single article failing is
//! logged and skipped, because the other candidates are independent.

use crate::dedup::{normalize_url, SeenSet};
use crate::extract::FieldExtractor;
use crate::fetch::PageFetcher;
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static ARTICLE_TEASER: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CANONICAL_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[itemprop="url"]"#).unwrap());

/// Orchestrates one front-page pass.
///
/// Owns the fetcher and extractor; the [`SeenSet`] is passed in by the
/// caller so its lifetime is not tied to any single cycle.
pub struct ScrapeCycle {
    fetcher: Box<dyn PageFetcher>,
    extractor: FieldExtractor,
    front_page_url: Url,
}

impl ScrapeCycle {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        extractor: FieldExtractor,
        front_page_url: Url,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            front_page_url,
        }
    }

    /// Run one cycle and return the batch of newly discovered records.
    ///
    /// The batch is empty when the front page could not be fetched, when no
    /// candidates were new, or when every new candidate failed. Successfully
    /// extracted articles are marked seen; failed ones are not, so they are
    /// retried on the next cycle.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self, seen: &mut SeenSet) -> Vec<ArticleRecord> {
        let html = match self.fetcher.fetch(self.front_page_url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                error!(url = %self.front_page_url, error = %e, "Front page fetch failed; aborting cycle");
                return Vec::new();
            }
        };

        let candidates = {
            let document = Html::parse_document(&html);
            self.collect_candidate_urls(&document)
        };
        debug!(count = candidates.len(), "Enumerated front page candidates");

        let mut batch = Vec::new();
        for url in candidates {
            if seen.contains(&url) {
                debug!(%url, "Already seen; skipping");
                continue;
            }

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, error = %e, "Article fetch failed; will retry next cycle");
                    continue;
                }
            };

            let record = {
                let document = Html::parse_document(&body);
                self.extractor.extract(&document, url.clone())
            };
            match record {
                Ok(record) => {
                    // Re-check: two teasers can normalize to the same URL.
                    if seen.insert(&url) {
                        batch.push(record);
                    } else {
                        debug!(%url, "Duplicate within cycle; dropping");
                    }
                }
                Err(e) => {
                    warn!(%url, error = %e, "Field extraction failed; will retry next cycle");
                }
            }
        }

        info!(new = batch.len(), seen = seen.len(), "Cycle complete");
        batch
    }

    /// Enumerate candidate article URLs, normalized and resolved.
    ///
    /// Teasers without a canonical-URL anchor are skipped; they are common
    /// on front pages (ads, embeds) and not an error.
    fn collect_candidate_urls(&self, document: &Html) -> Vec<String> {
        let mut urls = Vec::new();
        for teaser in document.select(&ARTICLE_TEASER) {
            let href = teaser
                .select(&CANONICAL_LINK)
                .next()
                .and_then(|link| link.value().attr("href"));
            let Some(href) = href else {
                debug!("Teaser without canonical link; skipping");
                continue;
            };
            match self.front_page_url.join(href) {
                Ok(resolved) => urls.push(normalize_url(resolved.as_str())),
                Err(e) => warn!(href, error = %e, "Unresolvable article href; skipping"),
            }
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use chrono::FixedOffset;
    use reqwest::StatusCode;
    use std::collections::HashMap;

    const FRONT: &str = "https://news.example/";

    enum MockPage {
        Html(&'static str),
        Status(u16),
    }

    struct MockFetcher {
        pages: HashMap<String, MockPage>,
    }

    impl MockFetcher {
        fn new(pages: Vec<(&str, MockPage)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(url, page)| (url.to_string(), page))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            match self.pages.get(url) {
                Some(MockPage::Html(body)) => Ok(body.to_string()),
                Some(MockPage::Status(code)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: StatusCode::from_u16(*code).unwrap(),
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: StatusCode::NOT_FOUND,
                }),
            }
        }
    }

    fn teaser(href: &str) -> String {
        format!(r#"<article><a itemprop="url" href="{href}">teaser</a></article>"#)
    }

    fn article_page(title: &str) -> String {
        format!(
            r#"<h1 data-test-tag="headline">{title}</h1>
               <p data-test-tag="lead-text">Lead for {title}</p>
               <div data-test-tag="byline:authors">Staff</div>
               <time itemprop="dateModified" datetime="2024-03-01T10:00:00Z"></time>"#
        )
    }

    fn cycle(fetcher: MockFetcher) -> ScrapeCycle {
        let extractor = FieldExtractor::new(FixedOffset::east_opt(3600).unwrap(), false);
        ScrapeCycle::new(Box::new(fetcher), extractor, Url::parse(FRONT).unwrap())
    }

    #[tokio::test]
    async fn test_front_page_failure_aborts_cycle() {
        let fetcher = MockFetcher::new(vec![(FRONT, MockPage::Status(503))]);
        let mut seen = SeenSet::new();
        let batch = cycle(fetcher).run(&mut seen).await;
        assert!(batch.is_empty());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_single_article_extracted() {
        let front = teaser("https://news.example/a?utm=1");
        let fetcher = MockFetcher::new(vec![
            (FRONT, MockPage::Html(Box::leak(front.into_boxed_str()))),
            (
                "https://news.example/a",
                MockPage::Html(Box::leak(article_page("Alpha").into_boxed_str())),
            ),
        ]);
        let mut seen = SeenSet::new();
        let batch = cycle(fetcher).run(&mut seen).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].title, "Alpha");
        assert_eq!(batch[0].source_url, "https://news.example/a");
        assert!(seen.contains("https://news.example/a"));
    }

    #[tokio::test]
    async fn test_relative_href_resolved_against_front_page() {
        let front = teaser("/section/b?x=2");
        let fetcher = MockFetcher::new(vec![
            (FRONT, MockPage::Html(Box::leak(front.into_boxed_str()))),
            (
                "https://news.example/section/b",
                MockPage::Html(Box::leak(article_page("Beta").into_boxed_str())),
            ),
        ]);
        let mut seen = SeenSet::new();
        let batch = cycle(fetcher).run(&mut seen).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].source_url, "https://news.example/section/b");
    }

    #[tokio::test]
    async fn test_teaser_without_canonical_link_skipped() {
        let front = format!(
            r#"<article><a href="https://news.example/x">no marker</a></article>{}"#,
            teaser("https://news.example/a")
        );
        let fetcher = MockFetcher::new(vec![
            (FRONT, MockPage::Html(Box::leak(front.into_boxed_str()))),
            (
                "https://news.example/a",
                MockPage::Html(Box::leak(article_page("Alpha").into_boxed_str())),
            ),
        ]);
        let mut seen = SeenSet::new();
        let batch = cycle(fetcher).run(&mut seen).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].title, "Alpha");
    }

    #[tokio::test]
    async fn test_cycle_fault_isolation() {
        // Five candidates, the second fails to fetch. The rest still land.
        let front: String = (1..=5)
            .map(|i| teaser(&format!("https://news.example/{i}")))
            .collect();
        let mut pages = vec![(FRONT, MockPage::Html(Box::leak(front.into_boxed_str())))];
        for i in [1usize, 3, 4, 5] {
            pages.push((
                Box::leak(format!("https://news.example/{i}").into_boxed_str()),
                MockPage::Html(Box::leak(article_page(&format!("Article {i}")).into_boxed_str())),
            ));
        }
        pages.push(("https://news.example/2", MockPage::Status(500)));

        let fetcher = MockFetcher::new(pages);
        let mut seen = SeenSet::new();
        let batch = cycle(fetcher).run(&mut seen).await;
        assert_eq!(batch.len(), 4);
        let titles: Vec<&str> = batch.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Article 1", "Article 3", "Article 4", "Article 5"]
        );
        assert!(!seen.contains("https://news.example/2"));
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        // Three candidates: one already seen, one fetch failure, one good.
        let front: String = [
            teaser("https://news.example/seen"),
            teaser("https://news.example/broken"),
            teaser("https://news.example/fresh?ref=front"),
        ]
        .concat();
        let fetcher = MockFetcher::new(vec![
            (FRONT, MockPage::Html(Box::leak(front.into_boxed_str()))),
            ("https://news.example/broken", MockPage::Status(500)),
            (
                "https://news.example/fresh",
                MockPage::Html(Box::leak(article_page("Fresh").into_boxed_str())),
            ),
        ]);
        let mut seen = SeenSet::new();
        seen.insert("https://news.example/seen");

        let scrape = cycle(fetcher);
        let batch = scrape.run(&mut seen).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].title, "Fresh");
        assert_eq!(seen.len(), 2);

        // The failed article was not marked seen, so it is retried.
        assert!(!seen.contains("https://news.example/broken"));
        let batch = scrape.run(&mut seen).await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_seen_articles_never_reextracted() {
        let front = teaser("https://news.example/a");
        let fetcher = MockFetcher::new(vec![
            (FRONT, MockPage::Html(Box::leak(front.into_boxed_str()))),
            (
                "https://news.example/a",
                MockPage::Html(Box::leak(article_page("Alpha").into_boxed_str())),
            ),
        ]);
        let mut seen = SeenSet::new();
        let scrape = cycle(fetcher);

        let batch = scrape.run(&mut seen).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(seen.len(), 1);

        for _ in 0..3 {
            let batch = scrape.run(&mut seen).await;
            assert!(batch.is_empty());
            assert_eq!(seen.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_duplicate_teasers_yield_one_record() {
        // Two teasers normalize to the same URL via differing query strings.
        let front = format!(
            "{}{}",
            teaser("https://news.example/a?slot=top"),
            teaser("https://news.example/a?slot=bottom")
        );
        let fetcher = MockFetcher::new(vec![
            (FRONT, MockPage::Html(Box::leak(front.into_boxed_str()))),
            (
                "https://news.example/a",
                MockPage::Html(Box::leak(article_page("Alpha").into_boxed_str())),
            ),
        ]);
        let mut seen = SeenSet::new();
        let batch = cycle(fetcher).run(&mut seen).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(seen.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_date_skips_article_and_retries() {
        let front = teaser("https://news.example/bad-date");
        let bad = r#"<h1 data-test-tag="headline">Bad</h1>
                     <time itemprop="dateModified" datetime="not-a-date"></time>"#;
        let fetcher = MockFetcher::new(vec![
            (FRONT, MockPage::Html(Box::leak(front.into_boxed_str()))),
            ("https://news.example/bad-date", MockPage::Html(bad)),
        ]);
        let mut seen = SeenSet::new();
        let batch = cycle(fetcher).run(&mut seen).await;
        assert!(batch.is_empty());
        assert!(!seen.contains("https://news.example/bad-date"));
    }
}
