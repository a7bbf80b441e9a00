/// Page slicing for feed listings
///
/// Takes the fully composed, ordered post sequence and cuts out the requested
/// page. Out-of-range page numbers clamp to the last valid page; values that
/// do not parse as a positive integer fall back to page 1.
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based current page number
    pub number: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Parse the raw `?page=` query value. Anything that is not a positive
/// integer is treated as absent.
pub fn parse_page_param(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&n| n >= 1)
}

pub fn paginate<T>(items: Vec<T>, page_size: usize, requested: Option<u32>) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = (total_items.div_ceil(page_size)).max(1) as u32;
    let number = requested.unwrap_or(1).clamp(1, total_pages);

    let start = (number as usize - 1) * page_size;
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        number,
        total_pages,
        total_items,
        has_next: number < total_pages,
        has_previous: number > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_ceil_of_n_over_p_pages() {
        for (n, p, expected) in [(0usize, 10usize, 1u32), (1, 10, 1), (10, 10, 1), (11, 10, 2), (25, 10, 3), (30, 10, 3)] {
            let items: Vec<usize> = (0..n).collect();
            let page = paginate(items, p, None);
            assert_eq!(page.total_pages, expected, "n={} p={}", n, p);
        }
    }

    #[test]
    fn union_of_pages_preserves_order() {
        let items: Vec<usize> = (0..23).collect();
        let total_pages = paginate(items.clone(), 5, None).total_pages;

        let mut reassembled = Vec::new();
        for number in 1..=total_pages {
            reassembled.extend(paginate(items.clone(), 5, Some(number)).items);
        }
        assert_eq!(reassembled, items);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let items: Vec<usize> = (0..13).collect();
        let page = paginate(items, 10, Some(99));

        assert_eq!(page.number, 2);
        assert_eq!(page.items, vec![10, 11, 12]);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn missing_page_defaults_to_first() {
        let items: Vec<usize> = (0..13).collect();
        let page = paginate(items, 10, None);

        assert_eq!(page.number, 1);
        assert_eq!(page.items.len(), 10);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn empty_source_yields_single_empty_page() {
        let page = paginate(Vec::<usize>::new(), 10, Some(4));

        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn page_metadata_reports_totals() {
        let items: Vec<usize> = (0..21).collect();
        let page = paginate(items, 10, Some(2));

        assert_eq!(page.total_items, 21);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn unparseable_raw_values_are_treated_as_absent() {
        assert_eq!(parse_page_param(None), None);
        assert_eq!(parse_page_param(Some("")), None);
        assert_eq!(parse_page_param(Some("abc")), None);
        assert_eq!(parse_page_param(Some("-3")), None);
        assert_eq!(parse_page_param(Some("0")), None);
        assert_eq!(parse_page_param(Some("2")), Some(2));
        assert_eq!(parse_page_param(Some(" 7 ")), Some(7));
    }
}
