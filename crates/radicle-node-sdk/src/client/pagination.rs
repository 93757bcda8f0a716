// Pagination support for the node API

/// Page selection for node listing endpoints.
///
/// Callers use 1-based page numbers; the node counts pages from zero. The
/// translation happens in [`ListOptions::query_pairs`]:
///
/// - `page == 0` omits the `page` parameter (node default, first page)
/// - `page > 0` sends `page - 1`
/// - `per_page == 0` omits the `perPage` parameter (node default size)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page number, or zero for "unspecified"
    pub page: u32,

    /// Items per page, or zero for the node's default
    pub per_page: u32,
}

impl ListOptions {
    /// Create list options for a 1-based page.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Encode as query parameters in the node's 0-based convention.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if self.page > 0 {
            pairs.push(("page", (self.page - 1).to_string()));
        }
        if self.per_page != 0 {
            pairs.push(("perPage", self.per_page.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
