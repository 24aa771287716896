// src/ui/pager.rs

/// Current page cursor; wraps around in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    total: usize,
    current: usize,
}

impl Pager {
    /// A pager over `total` pages. Zero is treated as one page.
    pub fn new(total: usize) -> Self {
        Self {
            total: total.max(1),
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.total;
        self.current
    }

    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.total - 1) % self.total;
        self.current
    }
}
