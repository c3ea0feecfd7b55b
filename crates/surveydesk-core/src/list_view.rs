// ── List view state ──
//
// Binds a list's filter state to its URL query string. Edits land in the
// optimistic `params` immediately; the URL (and the re-fetch it implies)
// follows after a debounced quiet period. The view starts with the data
// fetched for the initial URL, so the first paint never waits on a load.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use surveydesk_api::{FilterValue, Paginated};
use tokio::sync::watch;
use tracing::debug;

use crate::debounce::{CancelHandle, Debouncer};
use crate::page::ListParams;

/// Fetches one page for the given list state.
pub type Loader<T> = Arc<dyn Fn(ListParams) -> BoxFuture<'static, Option<Paginated<T>>> + Send + Sync>;

/// One user edit to a list's filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    Search(String),
    Page(u32),
    PageSize(u32),
    Filter { key: String, value: FilterValue },
    ClearFilter(String),
}

impl FilterEdit {
    pub fn apply_to(&self, params: &mut ListParams) {
        match self {
            Self::Search(text) => params.set_search(text),
            Self::Page(page) => params.set_page(*page),
            Self::PageSize(size) => params.set_page_size(*size),
            Self::Filter { key, value } => {
                params.filters.insert(key.clone(), value.clone());
                params.page = 1;
            }
            Self::ClearFilter(key) => {
                if params.filters.remove(key).is_some() {
                    params.page = 1;
                }
            }
        }
    }
}

struct Shared<T> {
    params: watch::Sender<ListParams>,
    url: watch::Sender<String>,
    data: watch::Sender<Arc<Paginated<T>>>,
    loader: Loader<T>,
    /// Bumped with every URL change; a load publishes only while its
    /// generation is still the latest.
    generation: AtomicU64,
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Commit the current optimistic state to the URL and reload. Returns
    /// `false` when the URL would not change.
    async fn commit(&self) -> bool {
        let params = self.params.borrow().clone();
        let query = params.query_string();

        let mut generation = 0;
        let changed = self.url.send_if_modified(|url| {
            if *url == query {
                return false;
            }
            url.clone_from(&query);
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            true
        });
        if !changed {
            return false;
        }
        debug!(%query, generation, "list filters committed");

        let (page, page_size) = (params.page, params.page_size);
        let loaded = (self.loader)(params)
            .await
            .unwrap_or_else(|| Paginated::empty(page, page_size))
            .conform_to(page, page_size);

        let published = self.data.send_if_modified(|data| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *data = Arc::new(loaded);
            true
        });
        if !published {
            debug!(generation, "superseded list load discarded");
        }
        true
    }
}

/// Filter, URL, and data state for one paginated list.
pub struct ListView<T> {
    shared: Arc<Shared<T>>,
    debouncer: Debouncer,
}

impl<T: Send + Sync + 'static> ListView<T> {
    /// Start from the server-rendered state for `params`.
    pub fn new(params: ListParams, initial: Paginated<T>, loader: Loader<T>) -> Self {
        Self::with_delay(params, initial, loader, Debouncer::DEFAULT_DELAY)
    }

    pub fn with_delay(
        params: ListParams,
        initial: Paginated<T>,
        loader: Loader<T>,
        delay: std::time::Duration,
    ) -> Self {
        let url = params.query_string();
        Self {
            shared: Arc::new(Shared {
                params: watch::Sender::new(params),
                url: watch::Sender::new(url),
                data: watch::Sender::new(Arc::new(initial)),
                loader,
                generation: AtomicU64::new(0),
            }),
            debouncer: Debouncer::new(delay),
        }
    }

    /// Optimistic state, including edits not yet committed.
    pub fn params(&self) -> ListParams {
        self.shared.params.borrow().clone()
    }

    /// Query string currently reflected in the URL.
    pub fn url(&self) -> String {
        self.shared.url.borrow().clone()
    }

    pub fn data(&self) -> Arc<Paginated<T>> {
        Arc::clone(&self.shared.data.borrow())
    }

    pub fn subscribe_params(&self) -> watch::Receiver<ListParams> {
        self.shared.params.subscribe()
    }

    pub fn subscribe_url(&self) -> watch::Receiver<String> {
        self.shared.url.subscribe()
    }

    pub fn subscribe_data(&self) -> watch::Receiver<Arc<Paginated<T>>> {
        self.shared.data.subscribe()
    }

    /// Apply an edit now and schedule the URL commit.
    pub fn apply(&self, edit: &FilterEdit) -> CancelHandle {
        self.shared
            .params
            .send_modify(|params| edit.apply_to(params));
        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(async move {
            shared.commit().await;
        })
    }

    /// Commit immediately, skipping the quiet period.
    pub async fn flush(&self) -> bool {
        self.debouncer.cancel_pending();
        self.shared.commit().await
    }
}

impl<T> std::fmt::Debug for ListView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("url", &*self.shared.url.borrow())
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures_util::FutureExt;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Recorder {
        calls: AtomicUsize,
        last: Mutex<Option<ListParams>>,
    }

    fn recording_loader(recorder: &Arc<Recorder>) -> Loader<String> {
        let recorder = Arc::clone(recorder);
        Arc::new(move |params: ListParams| {
            recorder.calls.fetch_add(1, Ordering::SeqCst);
            let items = vec![format!("page {}", params.page)];
            let (page, page_size) = (params.page, params.page_size);
            *recorder.last.lock().unwrap() = Some(params);
            async move {
                Some(Paginated {
                    items,
                    page,
                    page_size,
                    total: 1,
                })
            }
            .boxed()
        })
    }

    fn recorder() -> Arc<Recorder> {
        Arc::new(Recorder {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn view(recorder: &Arc<Recorder>) -> ListView<String> {
        let initial = Paginated {
            items: vec!["server".to_owned()],
            page: 1,
            page_size: 10,
            total: 1,
        };
        ListView::new(ListParams::default(), initial, recording_loader(recorder))
    }

    #[tokio::test(start_paused = true)]
    async fn initial_data_is_served_without_a_load() {
        let recorder = recorder();
        let view = view(&recorder);

        assert_eq!(view.data().items, vec!["server".to_owned()]);
        assert_eq!(view.url(), "?page=1&pageSize=10");
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_coalesce_into_one_fetch() {
        let recorder = recorder();
        let view = view(&recorder);

        for text in ["s", "su", "sur", "surv", "survey"] {
            view.apply(&FilterEdit::Search(text.to_owned()));
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
        assert_eq!(view.params().search.as_deref(), Some("survey"));
        assert_eq!(view.url(), "?page=1&pageSize=10");

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
        let last = recorder.last.lock().unwrap().clone().unwrap();
        assert_eq!(last.search.as_deref(), Some("survey"));
        assert_eq!(view.url(), "?page=1&pageSize=10&search=survey");
        assert_eq!(view.data().items, vec!["page 1".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_back_to_committed_state_does_not_fetch() {
        let recorder = recorder();
        let view = view(&recorder);

        view.apply(&FilterEdit::Search("x".into()));
        view.apply(&FilterEdit::Search(String::new()));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn search_resets_page_and_filters_are_kept() {
        let recorder = recorder();
        let view = view(&recorder);

        view.apply(&FilterEdit::Filter {
            key: "status".into(),
            value: "pending".into(),
        });
        view.apply(&FilterEdit::Page(3));
        assert!(view.flush().await);
        assert_eq!(view.url(), "?page=3&pageSize=10&status=pending");

        view.apply(&FilterEdit::Search("lot".into()));
        assert_eq!(view.params().page, 1);
        assert!(view.flush().await);
        assert_eq!(view.url(), "?page=1&pageSize=10&search=lot&status=pending");

        view.apply(&FilterEdit::ClearFilter("status".into()));
        assert!(view.flush().await);
        assert_eq!(view.url(), "?page=1&pageSize=10&search=lot");
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_load_does_not_overwrite_a_newer_commit() {
        let loader: Loader<String> = Arc::new(|params: ListParams| {
            let (page, page_size) = (params.page, params.page_size);
            let search = params.search.unwrap_or_default();
            async move {
                let delay = if search == "slow" { 2000 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Some(Paginated {
                    items: vec![search],
                    page,
                    page_size,
                    total: 1,
                })
            }
            .boxed()
        });
        let view = ListView::new(ListParams::default(), Paginated::default(), loader);

        view.apply(&FilterEdit::Search("slow".into()));
        tokio::time::sleep(Duration::from_millis(400)).await;
        view.apply(&FilterEdit::Search("fast".into()));
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(view.url(), "?page=1&pageSize=10&search=fast");
        assert_eq!(view.data().items, vec!["fast".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn loaded_page_follows_the_requested_size() {
        // Backend ignores pageSize: no echo, and more rows than asked for.
        let loader: Loader<String> = Arc::new(|_: ListParams| {
            async {
                let items: Vec<String> = (0..30).map(|i| format!("row {i}")).collect();
                Some(Paginated {
                    items,
                    page: 1,
                    page_size: 10,
                    total: 60,
                })
            }
            .boxed()
        });
        let view = ListView::new(ListParams::default(), Paginated::default(), loader);

        view.apply(&FilterEdit::PageSize(25));
        assert!(view.flush().await);

        let data = view.data();
        assert_eq!(data.len(), 25);
        assert_eq!(data.page_size, 25);
        assert_eq!(data.total_pages(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_publishes_an_empty_page() {
        let loader: Loader<String> =
            Arc::new(|_: ListParams| async { None::<Paginated<String>> }.boxed());
        let view = ListView::new(ListParams::default(), Paginated::default(), loader);

        view.apply(&FilterEdit::PageSize(25));
        assert!(view.flush().await);

        let data = view.data();
        assert!(data.is_empty());
        assert_eq!(data.page_size, 25);
    }
}
