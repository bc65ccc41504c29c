//! Page, query and page-size intents of a list view

use marquee_core::{Error, Result};

/// Page sizes the list view offers
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 20, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Pages reachable from the pager, whatever the remote reports
pub const MAX_VISIBLE_PAGES: u32 = 10;

/// Pager length after applying [`MAX_VISIBLE_PAGES`]
pub fn effective_total(total_pages: u32) -> u32 {
    total_pages.min(MAX_VISIBLE_PAGES)
}

/// Current list position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    page: u32,
    query: String,
    page_size: u32,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            page: 1,
            query: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BrowseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Move to `page`, clamped to the pager; returns whether it moved
    pub fn change_page(&mut self, page: u32, total_pages: u32) -> bool {
        let last = effective_total(total_pages).max(1);
        let target = page.clamp(1, last);
        let moved = target != self.page;
        self.page = target;
        moved
    }

    /// A new query starts over at page 1
    pub fn change_query(&mut self, query: &str) -> bool {
        if query == self.query {
            return false;
        }
        self.query = query.to_string();
        self.page = 1;
        true
    }

    /// Pick one of [`PAGE_SIZE_OPTIONS`]; a new size starts over at page 1
    pub fn change_page_size(&mut self, page_size: u32) -> Result<bool> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(Error::Validation(format!(
                "page size {page_size} is not one of {PAGE_SIZE_OPTIONS:?}"
            )));
        }
        if page_size == self.page_size {
            return Ok(false);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(true)
    }

    /// The first `page_size` items of a result page
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = items.len().min(self.page_size as usize);
        &items[..end]
    }

    /// Pager for the current page
    pub fn window(&self, total_pages: u32) -> PaginationWindow {
        PaginationWindow::new(self.page, total_pages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Numbered pager with ellipses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    current: u32,
    total: u32,
}

impl PaginationWindow {
    pub fn new(current: u32, total_pages: u32) -> Self {
        let total = effective_total(total_pages);
        Self {
            current: current.clamp(1, total.max(1)),
            total,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Page count after the cap
    pub fn total(&self) -> u32 {
        self.total
    }

    /// A single page needs no pager
    pub fn is_hidden(&self) -> bool {
        self.total <= 1
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// Buttons to render, left to right
    pub fn items(&self) -> Vec<PageItem> {
        use PageItem::{Ellipsis, Page};

        let (current, last) = (self.current, self.total);
        if self.is_hidden() {
            return Vec::new();
        }
        if last <= 7 {
            return (1..=last).map(Page).collect();
        }
        if current <= 4 {
            let mut items: Vec<_> = (1..=6).map(Page).collect();
            items.extend([Ellipsis, Page(last)]);
            return items;
        }
        if current >= last - 3 {
            let mut items = vec![Page(1), Ellipsis];
            items.extend((last - 5..=last).map(Page));
            return items;
        }
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(last),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_query_change_resets_page() {
        let mut state = BrowseState::new();
        state.change_page(4, 500);
        assert_eq!(state.page(), 4);

        assert!(state.change_query("dune"));
        assert_eq!(state.page(), 1);

        state.change_page(3, 500);
        assert!(!state.change_query("dune"));
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_page_size_change() {
        let mut state = BrowseState::new();
        state.change_page(5, 40);

        assert!(state.change_page_size(50).unwrap());
        assert_eq!(state.page(), 1);
        assert!(!state.change_page_size(50).unwrap());
        assert!(state.change_page_size(7).unwrap_err().is_validation());
        assert_eq!(state.page_size(), 50);
    }

    #[test]
    fn test_change_page_clamps_to_pager() {
        let mut state = BrowseState::new();
        state.change_page(42, 500);
        assert_eq!(state.page(), 10);

        state.change_page(0, 500);
        assert_eq!(state.page(), 1);

        state.change_page(3, 2);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_visible_truncates() {
        let mut state = BrowseState::new();
        state.change_page_size(5).unwrap();
        let items: Vec<u32> = (0..20).collect();

        assert_eq!(state.visible(&items), &[0, 1, 2, 3, 4]);
        assert_eq!(state.visible(&items[..3]).len(), 3);
    }

    #[test]
    fn test_window_small_total() {
        let window = PaginationWindow::new(2, 5);
        assert_eq!(window.items(), (1..=5).map(Page).collect::<Vec<_>>());
        assert!(window.has_previous() && window.has_next());

        assert!(PaginationWindow::new(1, 1).is_hidden());
        assert!(PaginationWindow::new(1, 0).items().is_empty());
    }

    #[test]
    fn test_window_capped_at_ten() {
        let window = PaginationWindow::new(1, 500);
        assert_eq!(window.total(), 10);
        assert_eq!(
            window.items(),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert!(!window.has_previous());
    }

    #[test]
    fn test_window_near_end() {
        let window = PaginationWindow::new(8, 500);
        assert_eq!(
            window.items(),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Page(8), Page(9), Page(10)]
        );

        let last = PaginationWindow::new(10, 10);
        assert!(!last.has_next());
    }

    #[test]
    fn test_window_middle() {
        let window = PaginationWindow::new(5, 9);
        assert_eq!(
            window.items(),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(9)]
        );
    }
}
