use serde::Deserialize;

use super::deserializers::deserialize_page_number;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page_number")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// Returns the 1-based `page` of `items`. Pages past the end, and pages below
/// 1, are empty.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let start = usize::try_from(page.saturating_sub(1))
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE));
    match start {
        Some(start) => items
            .into_iter()
            .skip(start)
            .take(QUESTIONS_PER_PAGE)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_pages_of_ten() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(paginate(items.clone(), 1), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(items.clone(), 2), (11..=20).collect::<Vec<_>>());
        assert_eq!(paginate(items.clone(), 3), (21..=25).collect::<Vec<_>>());
        assert!(paginate(items, 4).is_empty());
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<i32> = (1..=5).collect();
        assert!(paginate(items.clone(), 0).is_empty());
        assert!(paginate(items.clone(), -3).is_empty());
        assert!(paginate(items.clone(), i64::MIN).is_empty());
        assert!(paginate(items, i64::MAX).is_empty());
    }
}
