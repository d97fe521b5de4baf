use serde::Serialize;

/// Pagination envelope shared by every list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Total matching rows before the slice, not the slice length.
    pub count: i64,
    pub page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, count: i64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1) as i64;
        let total_pages = ((count + limit - 1) / limit).max(0) as u32;
        Self {
            data,
            count,
            page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Page::<u8>::new(vec![], 0, 1, 20).total_pages, 0);
        assert_eq!(Page::<u8>::new(vec![], 1, 1, 20).total_pages, 1);
        assert_eq!(Page::<u8>::new(vec![], 20, 1, 20).total_pages, 1);
        assert_eq!(Page::<u8>::new(vec![], 21, 1, 20).total_pages, 2);
    }

    #[test]
    fn zero_limit_is_treated_as_one() {
        assert_eq!(Page::<u8>::new(vec![], 5, 1, 0).total_pages, 5);
    }
}
