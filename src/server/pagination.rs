use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: i64 = 10;

/// `?page=N`, 1-based, defaults to the first page.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

impl Page {
    pub fn limit(&self) -> i64 {
        QUESTIONS_PER_PAGE
    }

    /// Row offset of this page, `None` when the page number is below 1.
    pub fn offset(&self) -> Option<i64> {
        if self.page < 1 {
            return None;
        }
        (self.page - 1).checked_mul(QUESTIONS_PER_PAGE)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page { page: first_page() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_step_by_page_size() {
        assert_eq!(Page::default().offset(), Some(0));
        assert_eq!(Page { page: 3 }.offset(), Some(20));
        assert_eq!(Page { page: 0 }.offset(), None);
        assert_eq!(Page { page: -4 }.offset(), None);
        assert_eq!(Page { page: i64::MAX }.offset(), None);
    }
}
