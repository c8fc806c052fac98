//! Position of one page within a filtered result set.

use serde::Serialize;

use super::PagingParams;

/// Where a page sits within the full result set.
///
/// Record positions are 1-based. Computed from the count taken after
/// filtering and before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub from_record: usize,
    pub to_record: usize,
    pub results_count: usize,
    pub pages_count: usize,
    pub current_page: usize,
    /// Zero when paging is off and every record is returned.
    pub page_size: usize,
}

impl PageSummary {
    /// Computes the summary for `results_count` records under `params`.
    ///
    /// ```
    /// use refine::{PageSummary, PagingParams};
    ///
    /// let summary = PageSummary::new(500, &PagingParams::new(50, 4));
    /// assert_eq!((summary.from_record, summary.to_record), (151, 200));
    /// assert_eq!(summary.pages_count, 10);
    /// ```
    pub fn new(results_count: usize, params: &PagingParams) -> Self {
        let page_size = params.page_size;
        if page_size == 0 {
            return PageSummary {
                from_record: 1,
                to_record: results_count,
                results_count,
                pages_count: 1,
                current_page: 1,
                page_size,
            };
        }

        let current_page = params.page_number();
        let pages_count = results_count.div_ceil(page_size).max(1);
        let (from_record, to_record) = if results_count > 0 {
            let from = params.offset().saturating_add(1);
            let to = from
                .saturating_add(page_size - 1)
                .min(results_count);
            (from, to)
        } else {
            (0, 0)
        };

        PageSummary {
            from_record,
            to_record,
            results_count,
            pages_count,
            current_page,
            page_size,
        }
    }
}
