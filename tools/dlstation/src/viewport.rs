/// Pagination math for the scrollable task list. One header row above and
/// one status row below the body; everything here is derived per render
/// pass, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

pub const HEADER_ROWS: u16 = 2;
pub const FOOTER_ROWS: u16 = 1;

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Rows available for task lines.
    pub fn body_height(&self) -> usize {
        self.height.saturating_sub(HEADER_ROWS + FOOTER_ROWS).max(1) as usize
    }

    /// Page index holding the given ordinal.
    pub fn page_for(&self, ordinal: usize) -> usize {
        ordinal / self.body_height()
    }

    /// Half-open range of ordinals visible on the page holding `ordinal`,
    /// clipped to the actual task count.
    pub fn visible_range(&self, ordinal: usize, task_count: usize) -> std::ops::Range<usize> {
        let body = self.body_height();
        let start = self.page_for(ordinal) * body;
        let start = start.min(task_count);
        start..(start + body).min(task_count)
    }
}
