//! Pagination entry points for queryable collections

use super::collection::QueryableCollection;
use super::executor::{execute_page, restrict};
use crate::collection::PaginatedCollection;
use crate::eager::{self, IdentityMap, RelatedLoader, RelationRegistry};
use crate::error::Result;
use crate::pagination::{self, Coercion, PageParam, PageSpec, PageWindow};
use crate::settings;
use crate::types::ForeignKeys;

/// Pagination for any [`QueryableCollection`].
///
/// Implemented for every queryable collection; there is nothing to
/// implement by hand. Each call returns its result to the caller and keeps
/// no state behind.
pub trait Paginate: QueryableCollection {
    /// Default page size in effect: a runtime override for this collection
    /// name, else the collection's own default
    fn page_size(&self) -> usize {
        settings::page_size_for(self.name()).unwrap_or_else(|| self.default_page_size())
    }

    /// Coercion mode configured for this collection
    fn coercion(&self) -> Coercion {
        settings::coercion_for(self.name())
    }

    /// Resolve a page spec against this collection's defaults
    fn page_window(&self, spec: &PageSpec) -> Result<PageWindow> {
        pagination::resolve(spec, self.page_size(), self.coercion())
    }

    /// The collection's query restricted to the requested page.
    ///
    /// Callers can keep composing the returned query before executing it.
    fn restrict_page(&self, spec: &PageSpec) -> Result<Self::Query> {
        self.restrict_query(self.query(), spec)
    }

    /// `query` restricted to the requested page; `query` itself is consumed
    /// and a new query returned, so a cloned base query stays as it was
    fn restrict_query(&self, query: Self::Query, spec: &PageSpec) -> Result<Self::Query> {
        let window = self.page_window(spec)?;
        Ok(restrict(self, query, window))
    }

    /// The collection's query capped at `limit` documents, starting at the
    /// first. Without a limit the default page size applies.
    fn per_page(&self, limit: Option<&PageParam>) -> Result<Self::Query> {
        let limit = pagination::resolve_limit(limit, self.page_size(), self.coercion())?;
        Ok(restrict(self, self.query(), PageWindow::first(limit)))
    }

    /// Fetch one page of the collection
    fn paginate(&self, spec: &PageSpec) -> Result<PaginatedCollection<Self::Item>> {
        self.paginate_query(self.query(), spec)
    }

    /// Fetch one page of an already-composed query
    fn paginate_query(
        &self,
        query: Self::Query,
        spec: &PageSpec,
    ) -> Result<PaginatedCollection<Self::Item>> {
        let window = self.page_window(spec)?;
        execute_page(self, query, window)
    }

    /// Fetch one page and prefetch the named relations into `cache`.
    ///
    /// Relation names are validated before the page query runs.
    fn paginate_eager<L, S>(
        &self,
        spec: &PageSpec,
        include: &[S],
        loader: &L,
        cache: &mut IdentityMap,
    ) -> Result<PaginatedCollection<Self::Item>>
    where
        Self::Item: ForeignKeys,
        L: RelatedLoader + ?Sized,
        S: AsRef<str>,
    {
        let registry = RelationRegistry::new(self.name(), self.relations());
        registry.resolve(include)?;

        let page = self.paginate(spec)?;
        eager::prefetch(&page, include, &registry, loader, cache)?;
        Ok(page)
    }
}

impl<C: QueryableCollection + ?Sized> Paginate for C {}
