//! Browser page state: the scanned listing, a cursor and the two-step
//! delete confirmation.

use solo_store::blockstore::DirEntry;

#[derive(Debug, Default)]
pub struct BrowsePage {
    entries: Vec<DirEntry>,
    cursor: usize,
    confirming: bool,
}

impl BrowsePage {
    pub fn new(entries: Vec<DirEntry>) -> Self {
        Self {
            entries,
            cursor: 0,
            confirming: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&DirEntry> {
        self.entries.get(self.cursor)
    }

    /// Moves the cursor, clamped to the listing. Any movement disarms a
    /// pending delete confirmation. Returns whether the cursor moved.
    pub fn scroll(&mut self, delta: i32) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let max = self.entries.len() as i64 - 1;
        let next = (self.cursor as i64 + i64::from(delta)).clamp(0, max) as usize;
        let moved = next != self.cursor;
        if moved {
            self.cursor = next;
            self.confirming = false;
        }
        moved
    }

    /// First Select in delete mode arms the confirmation.
    pub fn arm_confirm(&mut self) {
        if self.selected().is_some() {
            self.confirming = true;
        }
    }

    #[inline]
    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn disarm_confirm(&mut self) {
        self.confirming = false;
    }
}
