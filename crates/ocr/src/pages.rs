use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ledgerlens_core::{DocumentText, PageText};
use thiserror::Error;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Document incomplete: {received} of {expected} pages received")]
    IncompleteDocument { expected: usize, received: usize },
    #[error("Expected page count was never set")]
    ExpectedCountUnset,
    #[error("Document was already joined")]
    AlreadyJoined,
}

/// Write-many/read-once barrier between per-page producers and the parser.
///
/// Producers call [`submit`](Self::submit) from any thread in any order; a
/// page submitted twice overwrites its slot. Once the page count `n` is known
/// only indices `0..n` are kept, so completion means every one of them has
/// arrived. [`join`](Self::join) succeeds once, after completion; later
/// submissions are ignored.
#[derive(Debug, Default)]
pub struct PageAggregator {
    pages: Mutex<BTreeMap<usize, String>>,
    received: AtomicUsize,
    /// 0 while unknown.
    expected: AtomicUsize,
    joined: AtomicBool,
    complete: Notify,
}

impl PageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expected(expected: usize) -> Self {
        let aggregator = Self::new();
        aggregator.set_expected_page_count(expected);
        aggregator
    }

    fn slots(&self) -> MutexGuard<'_, BTreeMap<usize, String>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set or replace the number of pages the document has. Zero means unknown.
    /// Pages already held at an index `>= expected` are discarded.
    pub fn set_expected_page_count(&self, expected: usize) {
        {
            let mut slots = self.slots();
            self.expected.store(expected, Ordering::SeqCst);
            if expected > 0 {
                let dropped = slots.split_off(&expected);
                if !dropped.is_empty() {
                    tracing::warn!(
                        expected,
                        indices = ?dropped.keys().collect::<Vec<_>>(),
                        "pages beyond expected count discarded"
                    );
                }
            }
            self.received.store(slots.len(), Ordering::SeqCst);
        }
        if self.is_ready() {
            self.complete.notify_waiters();
        }
    }

    pub fn expected_page_count(&self) -> Option<usize> {
        match self.expected.load(Ordering::SeqCst) {
            0 => None,
            n => Some(n),
        }
    }

    /// Record one page's text. Re-submitting an index overwrites it.
    pub fn submit(&self, index: usize, text: impl Into<String>) {
        if self.joined.load(Ordering::SeqCst) {
            tracing::debug!(index, "page arrived after join, ignored");
            return;
        }
        {
            let mut slots = self.slots();
            if let Some(expected) = self.expected_page_count() {
                if index >= expected {
                    tracing::warn!(index, expected, "page index out of range, ignored");
                    return;
                }
            }
            if slots.insert(index, text.into()).is_none() {
                self.received.fetch_add(1, Ordering::SeqCst);
            } else {
                tracing::debug!(index, "page resubmitted, slot overwritten");
            }
        }
        if self.is_ready() {
            self.complete.notify_waiters();
        }
    }

    pub fn submit_page(&self, page: PageText) {
        self.submit(page.index, page.text);
    }

    /// Distinct page indices received so far.
    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    /// Whether at least `expected_total` distinct pages have arrived.
    pub fn is_complete(&self, expected_total: usize) -> bool {
        self.received() >= expected_total
    }

    /// Complete against the configured expected count.
    pub fn is_ready(&self) -> bool {
        self.expected_page_count()
            .is_some_and(|expected| self.is_complete(expected))
    }

    /// Resolves once the configured number of pages has arrived. Waits
    /// indefinitely; callers wanting a deadline wrap it in `tokio::time::timeout`.
    pub async fn wait_until_complete(&self) {
        loop {
            let notified = self.complete.notified();
            if self.is_ready() {
                return;
            }
            notified.await;
        }
    }

    /// Concatenate all pages by index, separated by a single space.
    pub fn join(&self) -> Result<DocumentText, AggregateError> {
        let expected = self
            .expected_page_count()
            .ok_or(AggregateError::ExpectedCountUnset)?;
        let received = self.received();
        if received < expected {
            return Err(AggregateError::IncompleteDocument { expected, received });
        }
        if self
            .joined
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AggregateError::AlreadyJoined);
        }

        let pages: Vec<PageText> = std::mem::take(&mut *self.slots())
            .into_iter()
            .map(|(index, text)| PageText { index, text })
            .collect();
        tracing::info!(pages = pages.len(), "document joined");
        Ok(DocumentText::from_pages(&pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn out_of_order_join_matches_in_order_join() {
        let shuffled = PageAggregator::with_expected(3);
        for i in [1, 0, 2] {
            shuffled.submit(i, format!("page{i}"));
        }
        let ordered = PageAggregator::with_expected(3);
        for i in [0, 1, 2] {
            ordered.submit(i, format!("page{i}"));
        }
        let a = shuffled.join().unwrap();
        assert_eq!(a, ordered.join().unwrap());
        assert_eq!(a.as_str(), "page0 page1 page2");
    }

    #[test]
    fn join_before_completion_is_incomplete_and_retryable() {
        let agg = PageAggregator::with_expected(2);
        agg.submit(0, "first");
        assert_eq!(
            agg.join(),
            Err(AggregateError::IncompleteDocument { expected: 2, received: 1 })
        );
        agg.submit(1, "second");
        assert_eq!(agg.join().unwrap().as_str(), "first second");
    }

    #[test]
    fn join_without_expected_count() {
        let agg = PageAggregator::new();
        agg.submit(0, "only");
        assert_eq!(agg.join(), Err(AggregateError::ExpectedCountUnset));
        agg.set_expected_page_count(1);
        assert!(agg.join().is_ok());
    }

    #[test]
    fn join_happens_once() {
        let agg = PageAggregator::with_expected(1);
        agg.submit(0, "text");
        assert!(agg.join().is_ok());
        assert_eq!(agg.join(), Err(AggregateError::AlreadyJoined));
    }

    #[test]
    fn resubmission_overwrites_without_counting() {
        let agg = PageAggregator::with_expected(2);
        agg.submit(0, "garbled");
        agg.submit(0, "retried");
        assert_eq!(agg.received(), 1);
        assert!(!agg.is_ready());
        agg.submit(1, "tail");
        assert_eq!(agg.join().unwrap().as_str(), "retried tail");
    }

    #[test]
    fn out_of_range_index_does_not_complete_document() {
        let agg = PageAggregator::with_expected(3);
        for i in [0, 1, 7] {
            agg.submit(i, format!("p{i}"));
        }
        assert_eq!(agg.received(), 2);
        assert!(!agg.is_ready());
        assert_eq!(
            agg.join(),
            Err(AggregateError::IncompleteDocument { expected: 3, received: 2 })
        );
        agg.submit(2, "p2");
        assert_eq!(agg.join().unwrap().as_str(), "p0 p1 p2");
    }

    #[test]
    fn expected_count_set_late_discards_out_of_range_pages() {
        let agg = PageAggregator::new();
        agg.submit(0, "a");
        agg.submit(5, "stray");
        agg.submit(1, "b");
        assert_eq!(agg.received(), 3);
        agg.set_expected_page_count(2);
        assert_eq!(agg.received(), 2);
        assert_eq!(agg.join().unwrap().as_str(), "a b");
    }

    #[test]
    fn late_page_after_join_is_ignored() {
        let agg = PageAggregator::with_expected(1);
        agg.submit(0, "done");
        agg.join().unwrap();
        agg.submit(1, "late");
        assert_eq!(agg.received(), 1);
    }

    #[test]
    fn is_complete_against_explicit_total() {
        let agg = PageAggregator::new();
        agg.submit_page(PageText::new(4, "x"));
        agg.submit_page(PageText::new(2, "y"));
        assert!(agg.is_complete(2));
        assert!(!agg.is_complete(3));
        assert!(!agg.is_ready());
    }

    #[tokio::test]
    async fn barrier_releases_after_concurrent_producers() {
        let agg = Arc::new(PageAggregator::with_expected(4));
        let waiter = {
            let agg = Arc::clone(&agg);
            tokio::spawn(async move {
                agg.wait_until_complete().await;
                agg.join()
            })
        };

        let mut producers = Vec::new();
        for i in (0..4).rev() {
            let agg = Arc::clone(&agg);
            producers.push(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5 * (4 - i as u64))).await;
                agg.submit(i, format!("p{i}"));
            }));
        }
        for p in producers {
            p.await.unwrap();
        }

        let doc = waiter.await.unwrap().unwrap();
        assert_eq!(doc.as_str(), "p0 p1 p2 p3");
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_complete() {
        let agg = PageAggregator::with_expected(1);
        agg.submit(0, "x");
        tokio::time::timeout(Duration::from_secs(1), agg.wait_until_complete())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn expected_count_set_after_pages_releases_waiter() {
        let agg = Arc::new(PageAggregator::new());
        agg.submit(0, "a");
        agg.submit(1, "b");
        let waiter = {
            let agg = Arc::clone(&agg);
            tokio::spawn(async move { agg.wait_until_complete().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        agg.set_expected_page_count(2);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
