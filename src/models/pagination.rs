use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn compute(total: usize, page: u32, page_size: u32) -> Self {
        let total_pages = if page_size > 0 {
            ((total as f64) / (page_size as f64)).ceil() as u32
        } else {
            1
        };
        Self {
            total: total as u64,
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Offset pagination over an already-filtered, already-sorted set. A page
/// past the end yields an empty slice with still-correct meta.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let meta = PageMeta::compute(items.len(), page, page_size);
    let offset = (page.saturating_sub(1) as usize) * (page_size as usize);
    let data = items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();
    Page { data, meta }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_disjoint_and_exhaustive() {
        let items: Vec<i32> = (0..23).collect();
        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let chunk = paginate(items.clone(), page, 5);
            assert_eq!(chunk.meta.total, 23);
            assert_eq!(chunk.meta.total_pages, 5);
            seen.extend(chunk.data);
            if !chunk.meta.has_next {
                break;
            }
            page += 1;
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn page_past_the_end_is_empty_with_correct_meta() {
        let chunk = paginate(vec![1, 2, 3], 9, 10);
        assert!(chunk.data.is_empty());
        assert_eq!(chunk.meta.total, 3);
        assert_eq!(chunk.meta.total_pages, 1);
        assert!(!chunk.meta.has_next);
        assert!(chunk.meta.has_prev);
    }
}
