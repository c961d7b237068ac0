use serde::Serialize;

/// Offset/limit paging. The backend reports no total, so "next" is only
/// offered when the last page came back full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub skip: u32,
    pub limit: u32,
    pub has_next: bool,
}

impl Pager {
    pub fn new(limit: u32) -> Self {
        Self {
            skip: 0,
            limit: limit.max(1),
            has_next: false,
        }
    }

    pub fn at(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            ..Self::new(limit)
        }
    }

    pub fn record_page(&mut self, len: usize) {
        self.has_next = len >= self.limit as usize;
    }

    pub fn has_previous(&self) -> bool {
        self.skip > 0
    }

    /// Move forward one page; false when there is nothing after this one
    pub fn advance(&mut self) -> bool {
        if !self.has_next {
            return false;
        }
        self.skip = self.skip.saturating_add(self.limit);
        true
    }

    /// Move back one page, clamped at zero; false when already at the start
    pub fn back(&mut self) -> bool {
        if self.skip == 0 {
            return false;
        }
        self.skip = self.skip.saturating_sub(self.limit);
        true
    }
}
