//! Query restriction and over-fetch execution

use super::collection::QueryableCollection;
use crate::collection::PaginatedCollection;
use crate::error::Result;
use crate::pagination::PageWindow;
use tracing::debug;

/// Apply a window's offset and limit to a query
pub fn restrict<C>(collection: &C, query: C::Query, window: PageWindow) -> C::Query
where
    C: QueryableCollection + ?Sized,
{
    collection.restrict_offset_limit(query, window.offset, window.limit)
}

/// Run `query` for `window` with a single read, asking for `limit + 1`
/// documents.
///
/// Returns at most `limit` documents and whether the store had more. An
/// uncapped window (limit 0) is passed through as uncapped and never
/// reports more results.
pub fn overfetch<C>(
    collection: &C,
    query: C::Query,
    window: PageWindow,
) -> Result<(Vec<C::Item>, bool)>
where
    C: QueryableCollection + ?Sized,
{
    let restricted =
        collection.restrict_offset_limit(query, window.offset, window.overfetch_limit());
    let mut items = collection.execute(&restricted)?;
    let fetched = items.len();

    let has_more = !window.is_uncapped() && fetched > window.limit;
    if has_more {
        items.truncate(window.limit);
    }

    debug!(
        collection = collection.name(),
        offset = window.offset,
        limit = window.limit,
        fetched,
        has_more,
        "Executed page query"
    );

    Ok((items, has_more))
}

/// Run `query` for `window` and wrap the result as a page
pub fn execute_page<C>(
    collection: &C,
    query: C::Query,
    window: PageWindow,
) -> Result<PaginatedCollection<C::Item>>
where
    C: QueryableCollection + ?Sized,
{
    let (items, has_more) = overfetch(collection, query, window)?;
    Ok(PaginatedCollection::from_window(items, window, has_more))
}
