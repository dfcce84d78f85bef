//! Page navigation for the post list.

use serde::Serialize;

/// One entry in the numbered page bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageLink {
    /// A numbered page.
    Page {
        /// 1-based page number.
        number: usize,
        /// Whether this is the page being shown.
        current: bool,
    },
    /// Skipped pages.
    Ellipsis,
}

/// Navigation state for one page of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Page being shown, 1-based.
    pub current: usize,
    /// Number of pages.
    pub total_pages: usize,
    /// Previous page, if any.
    pub prev: Option<usize>,
    /// Next page, if any.
    pub next: Option<usize>,
    /// Numbered links.
    pub links: Vec<PageLink>,
}

impl Pagination {
    /// Build navigation, or `None` when everything fits on one page.
    #[must_use]
    pub fn new(current: usize, total: usize, page_size: usize, has_more: bool) -> Option<Self> {
        if page_size == 0 || total <= page_size {
            return None;
        }

        let total_pages = total.div_ceil(page_size);
        Some(Self {
            current,
            total_pages,
            prev: (current > 1).then(|| current - 1),
            next: has_more.then(|| current + 1),
            links: page_links(current, total_pages),
        })
    }
}

/// First, last, current and adjacent pages, with an ellipsis over each gap.
#[must_use]
pub fn page_links(current: usize, total_pages: usize) -> Vec<PageLink> {
    let mut links = Vec::new();
    let mut previous: Option<usize> = None;

    for number in 1..=total_pages {
        let shown = number == 1 || number == total_pages || number.abs_diff(current) <= 1;
        if !shown {
            continue;
        }
        if previous.is_some_and(|p| number - p > 1) {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page {
            number,
            current: number == current,
        });
        previous = Some(number);
    }

    links
}
