//! Accumulating entry list with search and sort

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use dex_core::{Cursor, DexSource, EntrySummary, FetchError, Page};

/// List ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Name,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Id => "Number",
            SortKey::Name => "Name",
        }
    }
}

/// A page the browser wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<Cursor>,
    pub limit: usize,
}

/// Entries accumulated from sequential page fetches
pub struct ListBrowser {
    entries: Vec<EntrySummary>,
    page_size: usize,
    next_cursor: Option<Cursor>,
    exhausted: bool,
    in_flight: bool,
    last_error: Option<FetchError>,
    filter: String,
    sort: SortKey,
}

impl ListBrowser {
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            page_size: page_size.max(1),
            next_cursor: None,
            exhausted: false,
            in_flight: false,
            last_error: None,
            filter: String::new(),
            sort: SortKey::Id,
        }
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut String {
        &mut self.filter
    }

    /// Paging is suspended while this is true
    pub fn is_filtering(&self) -> bool {
        !self.filter.trim().is_empty()
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn entries(&self) -> &[EntrySummary] {
        &self.entries
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Error of the last page request, cleared by the next success
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Entries matching the filter, in the selected order
    pub fn visible(&self) -> Vec<&EntrySummary> {
        let filter = self.filter.trim().to_lowercase();
        let mut visible: Vec<&EntrySummary> = self
            .entries
            .iter()
            .filter(|entry| filter.is_empty() || matches_filter(entry, &filter))
            .collect();

        // sort_by is stable: equal keys keep their arrival order
        match self.sort {
            SortKey::Id => visible.sort_by_key(|entry| entry.id),
            SortKey::Name => visible.sort_by_cached_key(|entry| entry.name.to_lowercase()),
        }
        visible
    }

    /// Claim the next page request, if one should be made now
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.in_flight || self.exhausted || self.is_filtering() {
            return None;
        }
        self.in_flight = true;
        Some(PageRequest {
            cursor: self.next_cursor,
            limit: self.page_size,
        })
    }

    /// Record the outcome of the request claimed by `begin_fetch`
    ///
    /// Returns the number of appended entries.
    pub fn finish_fetch(&mut self, result: Result<Page, FetchError>) -> usize {
        self.in_flight = false;
        match result {
            Ok(page) => {
                let appended = page.entries.len();
                self.entries.extend(page.entries);
                self.next_cursor = page.next_cursor;
                self.exhausted = page.next_cursor.is_none();
                self.last_error = None;
                debug!("Appended {} entries ({} total)", appended, self.entries.len());
                appended
            }
            Err(error) => {
                warn!("Failed to load list page: {}", error);
                self.last_error = Some(error);
                0
            }
        }
    }

    /// Fetch and append the next page directly
    pub async fn load_next(&mut self, source: &dyn DexSource) -> usize {
        let Some(request) = self.begin_fetch() else {
            return 0;
        };
        let result = source.page(request.cursor, request.limit).await;
        self.finish_fetch(result)
    }
}

/// Case-insensitive name substring, or the exact decimal id
///
/// `filter` must already be trimmed and lowercased.
fn matches_filter(entry: &EntrySummary, filter: &str) -> bool {
    entry.name.to_lowercase().contains(filter) || entry.id.to_string() == filter
}

/// Runs page requests on the runtime and hands results back to the UI thread
pub struct PageFeed {
    source: Arc<dyn DexSource>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Result<Page, FetchError>>,
    rx: mpsc::UnboundedReceiver<Result<Page, FetchError>>,
}

impl PageFeed {
    pub fn new(source: Arc<dyn DexSource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            tx,
            rx,
        }
    }

    /// Start the next page request of `browser`, if it wants one
    pub fn request(&self, browser: &mut ListBrowser) -> bool {
        let Some(request) = browser.begin_fetch() else {
            return false;
        };
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = source.page(request.cursor, request.limit).await;
            if tx.send(result).is_err() {
                trace!("Page at {:?} finished after its list closed", request.cursor);
            }
        });
        true
    }

    /// Apply every finished page; returns the number of appended entries
    pub fn poll(&mut self, browser: &mut ListBrowser) -> usize {
        let mut appended = 0;
        while let Ok(result) = self.rx.try_recv() {
            appended += browser.finish_fetch(result);
        }
        appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::Identifier;
    use dex_data::MemorySource;

    fn starters() -> ListBrowser {
        let mut browser = ListBrowser::new(21);
        browser.begin_fetch();
        browser.finish_fetch(Ok(Page {
            entries: vec![
                EntrySummary::new(3, "venusaur"),
                EntrySummary::new(1, "bulbasaur"),
                EntrySummary::new(2, "ivysaur"),
            ],
            next_cursor: None,
        }));
        browser
    }

    fn names(visible: &[&EntrySummary]) -> Vec<String> {
        visible.iter().map(|entry| entry.name.clone()).collect()
    }

    #[test]
    fn test_filter_by_exact_id() {
        let mut browser = starters();
        browser.set_filter("2");
        let visible = browser.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, Identifier::new(2));
    }

    #[test]
    fn test_filter_by_name_substring() {
        let mut browser = starters();
        browser.set_filter("saur");
        assert_eq!(browser.visible().len(), 3);

        browser.set_filter("  IVY ");
        assert_eq!(names(&browser.visible()), vec!["ivysaur"]);
    }

    #[test]
    fn test_sort_orders() {
        let mut browser = starters();
        assert_eq!(names(&browser.visible()), vec!["bulbasaur", "ivysaur", "venusaur"]);

        browser.set_sort(SortKey::Name);
        assert_eq!(names(&browser.visible()), vec!["bulbasaur", "ivysaur", "venusaur"]);
    }

    #[test]
    fn test_name_sort_is_case_insensitive_and_stable() {
        let mut browser = ListBrowser::new(10);
        browser.begin_fetch();
        browser.finish_fetch(Ok(Page {
            entries: vec![
                EntrySummary::new(10, "Mew"),
                EntrySummary::new(4, "abra"),
                EntrySummary::new(7, "mew"),
            ],
            next_cursor: Some(Cursor(3)),
        }));
        browser.set_sort(SortKey::Name);

        let ids: Vec<i64> = browser.visible().iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![4, 10, 7]);
    }

    #[test]
    fn test_paging_suspended_while_filtering() {
        let mut browser = ListBrowser::new(2);
        let first = browser.begin_fetch().unwrap();
        assert_eq!(first, PageRequest { cursor: None, limit: 2 });
        assert!(browser.begin_fetch().is_none());

        browser.finish_fetch(Ok(Page {
            entries: vec![EntrySummary::new(1, "bulbasaur"), EntrySummary::new(2, "ivysaur")],
            next_cursor: Some(Cursor(2)),
        }));

        browser.set_filter("bulb");
        assert!(browser.begin_fetch().is_none());

        browser.set_filter("");
        assert_eq!(browser.begin_fetch().unwrap().cursor, Some(Cursor(2)));
    }

    #[test]
    fn test_failed_page_can_be_retried() {
        let mut browser = ListBrowser::new(2);
        browser.begin_fetch();
        assert_eq!(browser.finish_fetch(Err(FetchError::Unavailable("offline".into()))), 0);
        assert!(!browser.is_loading());
        assert!(browser.last_error().is_some());
        assert_eq!(browser.begin_fetch().unwrap().cursor, None);
        browser.finish_fetch(Ok(Page::default()));
        assert!(browser.last_error().is_none());
    }

    #[tokio::test]
    async fn test_load_until_exhausted() {
        let source = (1..=5).fold(MemorySource::new("memory"), |source, i| {
            source.with_entry(EntrySummary::new(i, format!("entry-{}", i)))
        });
        let mut browser = ListBrowser::new(2);

        assert_eq!(browser.load_next(&source).await, 2);
        assert_eq!(browser.load_next(&source).await, 2);
        assert_eq!(browser.load_next(&source).await, 1);
        assert!(browser.is_exhausted());
        assert_eq!(browser.load_next(&source).await, 0);
        assert_eq!(browser.entries().len(), 5);
    }

    #[tokio::test]
    async fn test_page_feed_round_trip() {
        let source = (1..=3).fold(MemorySource::new("memory"), |source, i| {
            source.with_entry(EntrySummary::new(i, format!("entry-{}", i)))
        });
        let mut feed = PageFeed::new(Arc::new(source), Handle::current());
        let mut browser = ListBrowser::new(21);

        assert!(feed.request(&mut browser));
        assert!(!feed.request(&mut browser));

        let mut appended = 0;
        while appended == 0 {
            tokio::task::yield_now().await;
            appended = feed.poll(&mut browser);
        }
        assert_eq!(appended, 3);
        assert!(browser.is_exhausted());
    }

    #[tokio::test]
    async fn test_page_finishing_after_list_closed() {
        let source = MemorySource::new("memory").with_entry(EntrySummary::new(1, "bulbasaur"));
        let feed = PageFeed::new(Arc::new(source), Handle::current());
        let mut browser = ListBrowser::new(21);

        assert!(feed.request(&mut browser));
        drop(feed);
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(browser.is_loading());
        assert!(browser.entries().is_empty());
    }
}
