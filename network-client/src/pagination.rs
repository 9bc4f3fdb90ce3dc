use crate::models::PAGE_SIZE;

/// Number of pages needed to show `count` items.
pub fn total_pages(count: u64) -> u32 {
    let pages = count.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Previous/next control for a paged listing. Pure presentation: it only
/// reports which page the viewer may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControl {
    pub current: u32,
    pub total: u32,
}

impl PaginationControl {
    /// `None` when there is nothing to page through.
    pub fn new(current: u32, total: u32) -> Option<Self> {
        if total <= 1 {
            return None;
        }
        Some(Self {
            current: current.clamp(1, total),
            total,
        })
    }

    pub fn previous(&self) -> Option<u32> {
        (self.current > 1).then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        (self.current < self.total).then(|| self.current + 1)
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current, self.total)
    }
}
