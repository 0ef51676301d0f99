use serde::Deserialize;
use std::num::IntErrorKind;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    /// The requested page, if the parameter was sent at all. A value that is
    /// not a number falls back to page 1; numbers too large for `i64` stay
    /// past the end.
    pub fn requested(&self) -> Option<i64> {
        self.page.as_deref().map(|raw| match raw.trim().parse::<i64>() {
            Ok(page) => page,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
            Err(_) => 1,
        })
    }
}

/// Slices out `page` (1-based) or returns everything when no page was asked
/// for. Pages outside the list come back empty.
pub fn paginate<T>(items: Vec<T>, page: Option<i64>) -> Vec<T> {
    let Some(page) = page else {
        return items;
    };
    if page < 1 {
        return Vec::new();
    }

    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE));
    match start {
        Some(start) if start < items.len() => items
            .into_iter()
            .skip(start)
            .take(QUESTIONS_PER_PAGE)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_page_returns_everything() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(paginate(items.clone(), None), items);
    }

    #[test]
    fn pages_are_ten_wide() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(paginate(items.clone(), Some(1)), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(items.clone(), Some(3)), vec![21, 22, 23, 24, 25]);
        assert!(paginate(items.clone(), Some(4)).is_empty());
        assert!(paginate(items, Some(1000)).is_empty());
    }

    #[test]
    fn non_positive_pages_are_empty() {
        let items: Vec<i32> = (1..=25).collect();
        assert!(paginate(items.clone(), Some(0)).is_empty());
        assert!(paginate(items, Some(-2)).is_empty());
    }

    #[test]
    fn page_param_parsing() {
        let params = |v: Option<&str>| PageParams {
            page: v.map(str::to_string),
        };
        assert_eq!(params(None).requested(), None);
        assert_eq!(params(Some("2")).requested(), Some(2));
        assert_eq!(params(Some("abc")).requested(), Some(1));
        assert_eq!(params(Some("")).requested(), Some(1));
        assert_eq!(
            params(Some("99999999999999999999")).requested(),
            Some(i64::MAX)
        );
        assert_eq!(
            params(Some("-99999999999999999999")).requested(),
            Some(i64::MIN)
        );
        assert!(paginate(vec![1, 2, 3], params(Some("99999999999999999999")).requested()).is_empty());
    }

    proptest! {
        #[test]
        fn page_is_a_bounded_sub_slice(len in 0usize..80, page in 1i64..12) {
            let items: Vec<usize> = (0..len).collect();
            let got = paginate(items.clone(), Some(page));

            prop_assert!(got.len() <= QUESTIONS_PER_PAGE);
            let start = (page as usize - 1) * QUESTIONS_PER_PAGE;
            if start < len {
                let end = (start + QUESTIONS_PER_PAGE).min(len);
                prop_assert_eq!(&got[..], &items[start..end]);
            } else {
                prop_assert!(got.is_empty());
            }
        }
    }
}
