//! Sorting and slicing a filtered source into one page.
//!
//! [`PagingParams`] carries the request: page size, 1-based page number,
//! sort key and direction. A page size of zero turns paging off and returns
//! every record in sorted order. [`Pager`] resolves the sort key through a
//! [`SortRegistry`], orders and slices a [`Source`], and computes the
//! [`PageSummary`].

mod summary;

pub use summary::PageSummary;

use serde::{Deserialize, Serialize};

use crate::convert::FromParam;
use crate::error::Result;
use crate::params::Params;
use crate::sort::{Dir, SortRegistry};
use crate::source::Source;
use crate::traits::Refinable;

/// Paging request.
///
/// Deserializes from camelCase keys (`pageSize`, `pageNumber`, `sortBy`,
/// `desc`); missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagingParams {
    /// Records per page; `0` returns every record.
    pub page_size: usize,
    /// 1-based page number. `0` is read as `1`.
    pub page_number: usize,
    /// Requested sort key; blank or absent means the default ordering.
    pub sort_by: Option<String>,
    pub desc: bool,
}

impl Default for PagingParams {
    fn default() -> Self {
        PagingParams {
            page_size: 0,
            page_number: 1,
            sort_by: None,
            desc: false,
        }
    }
}

impl PagingParams {
    /// Parameter key for the page size.
    pub const PAGE_SIZE: &'static str = "pageSize";
    /// Parameter key for the page number.
    pub const PAGE_NUMBER: &'static str = "pageNumber";
    /// Parameter key for the sort key.
    pub const SORT_BY: &'static str = "sortBy";
    /// Parameter key for the descending flag.
    pub const DESC: &'static str = "desc";

    pub fn new(page_size: usize, page_number: usize) -> Self {
        PagingParams {
            page_size,
            page_number,
            ..Self::default()
        }
    }

    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    pub fn descending(mut self, desc: bool) -> Self {
        self.desc = desc;
        self
    }

    /// Reads paging keys out of request parameters.
    ///
    /// Only the first value of each key is used. Missing keys keep their
    /// defaults; a value that does not convert is an error.
    ///
    /// ```
    /// use refine::{Params, PagingParams};
    ///
    /// let params = Params::new().with("pageSize", "20").with("pageNumber", "3").with("desc", "true");
    /// let paging = PagingParams::from_params(&params).unwrap();
    /// assert_eq!(paging, PagingParams::new(20, 3).descending(true));
    /// ```
    pub fn from_params(params: &Params) -> Result<Self> {
        let mut paging = Self::default();
        if let Some(raw) = params.get(Self::PAGE_SIZE) {
            paging.page_size = usize::from_param(raw)?;
        }
        if let Some(raw) = params.get(Self::PAGE_NUMBER) {
            paging.page_number = usize::from_param(raw)?;
        }
        if let Some(raw) = params.get(Self::SORT_BY) {
            paging.sort_by = Some(raw.to_string());
        }
        if let Some(raw) = params.get(Self::DESC) {
            paging.desc = bool::from_param(raw)?;
        }
        Ok(paging)
    }

    /// The effective 1-based page number.
    pub fn page_number(&self) -> usize {
        self.page_number.max(1)
    }

    /// Records skipped before the requested page.
    pub fn offset(&self) -> usize {
        (self.page_number() - 1).saturating_mul(self.page_size)
    }

    pub fn dir(&self) -> Dir {
        Dir::from_desc(self.desc)
    }
}

/// Orders and slices sources according to one [`PagingParams`].
#[derive(Debug)]
pub struct Pager<T> {
    params: PagingParams,
    sorts: SortRegistry<T>,
}

impl<T: Refinable> Pager<T> {
    pub fn new(params: PagingParams, sorts: SortRegistry<T>) -> Self {
        Pager { params, sorts }
    }

    pub fn params(&self) -> &PagingParams {
        &self.params
    }

    pub fn sorts(&self) -> &SortRegistry<T> {
        &self.sorts
    }

    pub fn sorts_mut(&mut self) -> &mut SortRegistry<T> {
        &mut self.sorts
    }

    /// Sorts `source` by the requested key and cuts out the requested page.
    ///
    /// The sort key is resolved before the source is touched; an unknown
    /// key fails with [`RefineError::SortKeyNotFound`](crate::RefineError::SortKeyNotFound).
    pub fn order_and_page<S: Source<T>>(&self, source: S) -> Result<S> {
        let expr = self.sorts.resolve(self.params.sort_by.as_deref())?;
        tracing::debug!(
            dir = %self.params.dir(),
            page = self.params.page_number(),
            page_size = self.params.page_size,
            "ordering and paging"
        );
        let ordered = source.order(&expr, self.params.dir());
        if self.params.page_size == 0 {
            return Ok(ordered);
        }
        Ok(ordered.slice(self.params.offset(), self.params.page_size))
    }

    /// Like [`order_and_page`](Self::order_and_page), also returning the
    /// summary computed from the count before slicing.
    pub fn paginate<S: Source<T>>(&self, source: S) -> Result<(S, PageSummary)> {
        let summary = self.summary(source.count());
        let page = self.order_and_page(source)?;
        Ok((page, summary))
    }

    pub fn summary(&self, total: usize) -> PageSummary {
        PageSummary::new(total, &self.params)
    }

    pub fn supported_sort_properties(&self) -> Vec<String> {
        self.sorts.supported_sort_properties()
    }
}
