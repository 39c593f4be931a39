//! Fixed-size page window over the filtered view.

/// Records per page.
pub const PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageState {
    /// Zero-based; may point past the last page, which renders empty.
    pub index: usize,
}

impl PageState {
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(PAGE_SIZE)
    }
}

pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Slice `[index*PAGE_SIZE, index*PAGE_SIZE + PAGE_SIZE)` clipped to `items`.
pub fn page_window<T>(items: &[T], index: usize) -> &[T] {
    let start = index.saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}
