//! Domain-specific assertion macros for evq harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* page was wrong and *how*.

/// Assert that a page holds exactly the given titles, in order.
///
/// ```rust
/// assert_titles!(page, ["Jazz Night Market", "Solo Jazz"]);
/// ```
#[macro_export]
macro_rules! assert_titles {
    ($page:expr, [$($title:expr),* $(,)?]) => {{
        let page: &evq_core::EventPage = &$page;
        let expected: Vec<String> = vec![$($title.to_string()),*];
        pretty_assertions::assert_eq!(
            $crate::common::titles(page),
            expected,
            "assert_titles! failed (total = {})",
            page.total
        );
    }};
}

/// Assert that a page reports `total` and carries `returned` results.
#[macro_export]
macro_rules! assert_page {
    ($page:expr, total = $total:expr, returned = $returned:expr) => {{
        let page: &evq_core::EventPage = &$page;
        if page.total != $total || page.results.len() != $returned {
            panic!(
                "assert_page! failed:\n  expected: total={} returned={}\n  actual:   total={} returned={}\n  titles:   {:?}",
                $total,
                $returned,
                page.total,
                page.results.len(),
                $crate::common::titles(page)
            );
        }
    }};
}
