//! Cursor pagination engine.
//!
//! A [`PaginatedResource`] holds the first page of a connection. The engine
//! follows `page_info.end_cursor` through a caller-supplied continuation,
//! appending each page's edges in arrival order, until the server reports
//! no further pages.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::context::{ContextError, RequestContext};
use crate::variables::Variables;

/// Default cap on follow-up pages for one collection.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Relay-style page info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Cursor of the last edge on the page.
    #[serde(default)]
    pub end_cursor: Option<String>,
    /// Whether there is another page.
    #[serde(default)]
    pub has_next_page: bool,
}

impl PageInfo {
    /// Info for a final page.
    #[must_use]
    pub const fn last() -> Self {
        Self {
            end_cursor: None,
            has_next_page: false,
        }
    }

    /// Info for a page followed by the page after `cursor`.
    #[must_use]
    pub fn next(cursor: impl Into<String>) -> Self {
        Self {
            end_cursor: Some(cursor.into()),
            has_next_page: true,
        }
    }

    fn next_cursor(&self) -> Result<&str, PaginationError> {
        match self.end_cursor.as_deref() {
            Some(cursor) if !cursor.is_empty() => Ok(cursor),
            _ => Err(PaginationError::MissingCursor),
        }
    }
}

/// One connection: page info plus the edges accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResource<E> {
    /// Page info of the first page.
    #[serde(default)]
    pub page_info: PageInfo,
    /// Edges in page-arrival order.
    #[serde(default = "Vec::new")]
    pub edges: Vec<E>,
}

impl<E> Default for PaginatedResource<E> {
    fn default() -> Self {
        Self {
            page_info: PageInfo::default(),
            edges: Vec::new(),
        }
    }
}

/// Failures raised by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// `has_next_page` was set without a cursor to follow.
    #[error("pagination cursor is empty while more pages were announced")]
    MissingCursor,

    /// The page guard tripped.
    #[error("pagination stopped after {limit} pages")]
    PageLimitExceeded {
        /// Configured limit.
        limit: usize,
    },

    /// The request context finished between pages.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Upper bound on follow-up pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGuard {
    /// Maximum number of continuation calls.
    pub max_pages: usize,
}

impl Default for PageGuard {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl PageGuard {
    /// Guard with a custom bound.
    #[must_use]
    pub const fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }
}

/// Error returned by a page walk.
///
/// Continuation failures pass through untouched in `Fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError<E> {
    /// The continuation failed.
    Fetch(E),

    /// The engine stopped the walk.
    Engine(PaginationError),
}

impl<E: fmt::Display> fmt::Display for PageError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => err.fmt(f),
            Self::Engine(err) => err.fmt(f),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for PageError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(err) => err.source(),
            Self::Engine(err) => err.source(),
        }
    }
}

impl<E> PageError<E> {
    /// Collapse into the continuation's error type.
    pub fn into_fetch_or(self, engine: impl FnOnce(PaginationError) -> E) -> E {
        match self {
            Self::Fetch(err) => err,
            Self::Engine(err) => engine(err),
        }
    }
}

impl<E> PageError<E>
where
    E: From<PaginationError>,
{
    /// Collapse using `E: From<PaginationError>`.
    pub fn into_inner(self) -> E {
        self.into_fetch_or(E::from)
    }
}

impl<Edge> PaginatedResource<Edge> {
    /// Resource holding a single page.
    #[must_use]
    pub const fn new(page_info: PageInfo, edges: Vec<Edge>) -> Self {
        Self { page_info, edges }
    }

    /// Fetch every remaining page with the default [`PageGuard`].
    pub async fn fetch_pages<F, Fut, E>(
        &mut self,
        ctx: &RequestContext,
        variables: &Variables,
        next: F,
    ) -> Result<(), PageError<E>>
    where
        F: FnMut(RequestContext, Variables, String) -> Fut,
        Fut: Future<Output = Result<Self, E>>,
    {
        self.fetch_pages_guarded(ctx, variables, PageGuard::default(), next)
            .await
    }

    /// Fetch every remaining page, stopping after `guard.max_pages` calls.
    ///
    /// On any failure the edges gathered so far stay on `self`; they are
    /// incomplete and the error must be checked first.
    pub async fn fetch_pages_guarded<F, Fut, E>(
        &mut self,
        ctx: &RequestContext,
        variables: &Variables,
        guard: PageGuard,
        mut next: F,
    ) -> Result<(), PageError<E>>
    where
        F: FnMut(RequestContext, Variables, String) -> Fut,
        Fut: Future<Output = Result<Self, E>>,
    {
        let mut page = self.page_info.clone();
        let mut fetched = 0_usize;

        while page.has_next_page {
            let cursor = page.next_cursor().map_err(PageError::Engine)?.to_string();
            if fetched >= guard.max_pages {
                warn!(
                    limit = guard.max_pages,
                    edges = self.edges.len(),
                    "pagination page guard tripped"
                );
                return Err(PageError::Engine(PaginationError::PageLimitExceeded {
                    limit: guard.max_pages,
                }));
            }
            ctx.check()
                .map_err(|err| PageError::Engine(PaginationError::from(err)))?;

            debug!(cursor = %cursor, page = fetched + 1, "fetching next page");
            let next_page = next(ctx.clone(), variables.clone(), cursor)
                .await
                .map_err(PageError::Fetch)?;
            fetched += 1;

            self.edges.extend(next_page.edges);
            page = next_page.page_info;
        }

        Ok(())
    }
}

/// Fetch every remaining page of an optional resource.
///
/// `None` means nothing to paginate and is not an error.
pub async fn fetch_pages<Edge, F, Fut, E>(
    resource: Option<&mut PaginatedResource<Edge>>,
    ctx: &RequestContext,
    variables: &Variables,
    next: F,
) -> Result<(), PageError<E>>
where
    F: FnMut(RequestContext, Variables, String) -> Fut,
    Fut: Future<Output = Result<PaginatedResource<Edge>, E>>,
{
    match resource {
        Some(resource) => resource.fetch_pages(ctx, variables, next).await,
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use tokio::sync::watch;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FetchFailed(&'static str);

    type Pages = Arc<Mutex<VecDeque<Result<PaginatedResource<u32>, FetchFailed>>>>;

    fn pages(items: Vec<Result<PaginatedResource<u32>, FetchFailed>>) -> Pages {
        Arc::new(Mutex::new(items.into_iter().collect()))
    }

    fn serve(
        pages: &Pages,
        cursors: &Arc<Mutex<Vec<String>>>,
    ) -> impl FnMut(
        RequestContext,
        Variables,
        String,
    ) -> std::future::Ready<Result<PaginatedResource<u32>, FetchFailed>> {
        let pages = Arc::clone(pages);
        let cursors = Arc::clone(cursors);
        move |_ctx, _vars, cursor| {
            cursors.lock().expect("lock").push(cursor);
            let page = pages
                .lock()
                .expect("lock")
                .pop_front()
                .expect("unexpected page fetch");
            std::future::ready(page)
        }
    }

    #[tokio::test]
    async fn no_next_page_skips_continuation() {
        let mut resource = PaginatedResource::new(PageInfo::last(), vec![1, 2]);
        let cursors = Arc::new(Mutex::new(Vec::new()));
        resource
            .fetch_pages(&RequestContext::new(), &Variables::new(), serve(&pages(vec![]), &cursors))
            .await
            .expect("no pages");
        assert_eq!(resource.edges, vec![1, 2]);
        assert!(cursors.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn absent_resource_is_noop() {
        let cursors = Arc::new(Mutex::new(Vec::new()));
        let result = fetch_pages::<u32, _, _, FetchFailed>(
            None,
            &RequestContext::new(),
            &Variables::new(),
            serve(&pages(vec![]), &cursors),
        )
        .await;
        assert!(result.is_ok());
        assert!(cursors.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn pages_are_appended_in_order() {
        let mut resource = PaginatedResource::new(PageInfo::next("c1"), vec![1, 2]);
        let cursors = Arc::new(Mutex::new(Vec::new()));
        let remaining = pages(vec![
            Ok(PaginatedResource::new(PageInfo::next("c2"), vec![])),
            Ok(PaginatedResource::new(PageInfo::next("c3"), vec![3])),
            Ok(PaginatedResource::new(PageInfo::last(), vec![4, 5])),
        ]);

        resource
            .fetch_pages(&RequestContext::new(), &Variables::new(), serve(&remaining, &cursors))
            .await
            .expect("all pages");

        assert_eq!(resource.edges, vec![1, 2, 3, 4, 5]);
        assert_eq!(*cursors.lock().expect("lock"), vec!["c1", "c2", "c3"]);
        assert_eq!(resource.page_info, PageInfo::next("c1"));
    }

    #[tokio::test]
    async fn continuation_error_is_returned_unchanged_and_partial_edges_kept() {
        let mut resource = PaginatedResource::new(PageInfo::next("c1"), vec![1]);
        let cursors = Arc::new(Mutex::new(Vec::new()));
        let remaining = pages(vec![
            Ok(PaginatedResource::new(PageInfo::next("c2"), vec![2])),
            Err(FetchFailed("page 3 failed")),
        ]);

        let err = resource
            .fetch_pages(&RequestContext::new(), &Variables::new(), serve(&remaining, &cursors))
            .await
            .expect_err("third page fails");

        assert_eq!(err, PageError::Fetch(FetchFailed("page 3 failed")));
        assert_eq!(resource.edges, vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_cursor_fails_fast() {
        let mut resource = PaginatedResource::new(
            PageInfo {
                end_cursor: Some(String::new()),
                has_next_page: true,
            },
            vec![1],
        );
        let cursors = Arc::new(Mutex::new(Vec::new()));
        let err = resource
            .fetch_pages(&RequestContext::new(), &Variables::new(), serve(&pages(vec![]), &cursors))
            .await
            .expect_err("missing cursor");
        assert_eq!(err, PageError::Engine(PaginationError::MissingCursor));
        assert!(cursors.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn page_guard_stops_endless_walk() {
        let mut resource = PaginatedResource::new(PageInfo::next("c"), Vec::<u32>::new());
        let calls = Arc::new(Mutex::new(0_usize));
        let counter = Arc::clone(&calls);
        let err = resource
            .fetch_pages_guarded(
                &RequestContext::new(),
                &Variables::new(),
                PageGuard::new(3),
                move |_ctx, _vars, _cursor| {
                    *counter.lock().expect("lock") += 1;
                    std::future::ready(Ok::<_, FetchFailed>(PaginatedResource::new(
                        PageInfo::next("c"),
                        vec![0],
                    )))
                },
            )
            .await
            .expect_err("guard trips");
        assert_eq!(
            err,
            PageError::Engine(PaginationError::PageLimitExceeded { limit: 3 })
        );
        assert_eq!(*calls.lock().expect("lock"), 3);
        assert_eq!(resource.edges.len(), 3);
    }

    #[tokio::test]
    async fn cancellation_is_checked_between_pages() {
        let (tx, rx) = watch::channel(false);
        let ctx = RequestContext::new().with_cancellation(rx);
        let mut resource = PaginatedResource::new(PageInfo::next("c1"), vec![1]);
        let err = resource
            .fetch_pages(&ctx, &Variables::new(), move |_ctx, _vars, _cursor| {
                tx.send_replace(true);
                std::future::ready(Ok::<_, FetchFailed>(PaginatedResource::new(
                    PageInfo::next("c2"),
                    vec![2],
                )))
            })
            .await
            .expect_err("cancelled");
        assert_eq!(
            err,
            PageError::Engine(PaginationError::Context(ContextError::Cancelled))
        );
        assert_eq!(resource.edges, vec![1, 2]);
    }

    #[test]
    fn page_info_decodes_camel_case() {
        let resource: PaginatedResource<u32> = serde_json::from_value(serde_json::json!({
            "pageInfo": {"endCursor": "abc", "hasNextPage": true},
            "edges": [7]
        }))
        .expect("decode");
        assert_eq!(resource, PaginatedResource::new(PageInfo::next("abc"), vec![7]));
    }

    #[test]
    fn into_inner_converts_engine_errors() {
        #[derive(Debug, PartialEq)]
        enum Wrapped {
            Engine(PaginationError),
        }
        impl From<PaginationError> for Wrapped {
            fn from(err: PaginationError) -> Self {
                Self::Engine(err)
            }
        }
        let err: PageError<Wrapped> = PageError::Engine(PaginationError::MissingCursor);
        assert_eq!(err.into_inner(), Wrapped::Engine(PaginationError::MissingCursor));
    }
}
