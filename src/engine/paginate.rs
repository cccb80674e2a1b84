//! Page slicing and the page-number window shown under a result list.

use serde::Serialize;

/// Dossiers shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page numbers rendered at once.
pub const MAX_VISIBLE_PAGES: u32 = 10;

/// One page of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// Size of the whole result set, not just this page.
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

/// `ceil(total / page_size)`, saturating at `u32::MAX`.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    u32::try_from(total_count.div_ceil(page_size)).unwrap_or(u32::MAX)
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Slice a fully materialised result set.
pub fn paginate<T>(items: Vec<T>, page_size: u32, current_page: u32) -> ResultPage<T> {
    let page_size = page_size.max(1);
    let total_count = items.len() as u64;
    let total_pages = total_pages(total_count, page_size);
    let current_page = clamp_page(current_page, total_pages);

    let start = (current_page as usize - 1).saturating_mul(page_size as usize);
    let items = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    ResultPage {
        items,
        total_count,
        total_pages,
        current_page,
    }
}

/// Paging figures a server reports next to a page it sliced itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerPaging {
    pub total_count: u64,
    /// Page count as reported, if any.
    pub total_pages: Option<u64>,
    /// Hits the server put on this page, before any local exclusion.
    pub served: usize,
}

impl ServerPaging {
    /// Page count, preferring the server's figure.
    ///
    /// Without one the count is derived from the total and the size of the page the
    /// server served. Only a first page reveals that size; elsewhere `page_size` is
    /// assumed.
    pub fn page_count(&self, page_size: u32, current_page: u32) -> u32 {
        if let Some(reported) = self.total_pages {
            return u32::try_from(reported).unwrap_or(u32::MAX);
        }
        let observed = if current_page <= 1 && self.served > 0 {
            u32::try_from(self.served).unwrap_or(u32::MAX)
        } else {
            page_size
        };
        total_pages(self.total_count, observed)
    }
}

/// Wrap a page the server already sliced.
pub fn server_page<T>(
    items: Vec<T>,
    paging: ServerPaging,
    page_size: u32,
    current_page: u32,
) -> ResultPage<T> {
    let total_pages = paging.page_count(page_size, current_page);
    ResultPage {
        items,
        total_count: paging.total_count,
        total_pages,
        current_page: clamp_page(current_page, total_pages),
    }
}

/// Enabled/disabled state of the navigation controls plus the visible page numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub pages: Vec<u32>,
    pub current: u32,
    pub total_pages: u32,
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
}

impl PaginationControls {
    /// Whether the control bar should be rendered at all.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }
}

/// Page window of at most [`MAX_VISIBLE_PAGES`] around `current_page`.
///
/// The window starts five pages before the current one and is shifted left when it
/// would run past the last page. With one page or fewer every control is disabled.
pub fn controls(total_pages: u32, current_page: u32) -> PaginationControls {
    if total_pages == 0 {
        return PaginationControls {
            pages: Vec::new(),
            current: 1,
            total_pages,
            first: false,
            previous: false,
            next: false,
            last: false,
        };
    }

    let current = clamp_page(current_page, total_pages);
    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let mut end = start.saturating_add(MAX_VISIBLE_PAGES - 1);
    if end > total_pages {
        end = total_pages;
        start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
    }

    let navigable = total_pages > 1;
    PaginationControls {
        pages: (start..=end).collect(),
        current,
        total_pages,
        first: navigable && current > 1,
        previous: navigable && current > 1,
        next: navigable && current < total_pages,
        last: navigable && current < total_pages,
    }
}
