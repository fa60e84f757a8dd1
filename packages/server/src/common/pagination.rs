//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Raw `?limit=&offset=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Clamped pagination values safe to bind into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    pub fn page(&self) -> Page {
        Page {
            limit: self
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(
            PageParams::default().page(),
            Page {
                limit: DEFAULT_PAGE_SIZE,
                offset: 0
            }
        );
    }

    #[test]
    fn clamps_out_of_range_values() {
        let page = PageParams {
            limit: Some(10_000),
            offset: Some(-5),
        }
        .page();
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(page.offset, 0);

        let page = PageParams {
            limit: Some(0),
            offset: None,
        }
        .page();
        assert_eq!(page.limit, 1);
    }
}
