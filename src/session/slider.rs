//! Cursor-based pagination over an immutable snapshot.

/// Which end of the snapshot was passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderEdge {
    /// Moved before the first item.
    First,
    /// Moved past the last item.
    Last,
}

/// Result of moving the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideOutcome {
    /// The cursor now points at this 1-based position.
    Moved(usize),
    /// The cursor left the snapshot; the slider should be discarded.
    Exhausted(SliderEdge),
}

/// A 1-indexed cursor over a snapshot captured at entry.
///
/// Cursor `0` means "not yet entered". The snapshot is never refreshed; a
/// new slider must be built to observe newer data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Slider<T> {
    /// Captures a snapshot with the cursor before the first item.
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items, cursor: 0 }
    }

    /// Returns the 1-based cursor, `0` before entry.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the snapshot length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` for an empty snapshot.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` once the cursor points at an item.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.current().is_some()
    }

    /// Returns the item under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.cursor.checked_sub(1).and_then(|index| self.items.get(index))
    }

    /// Moves to the next item.
    pub fn advance(&mut self) -> SlideOutcome {
        if self.cursor >= self.items.len() {
            self.cursor = self.items.len() + 1;
            return SlideOutcome::Exhausted(SliderEdge::Last);
        }
        self.cursor += 1;
        SlideOutcome::Moved(self.cursor)
    }

    /// Moves to the previous item.
    pub fn retreat(&mut self) -> SlideOutcome {
        if self.cursor <= 1 {
            self.cursor = 0;
            return SlideOutcome::Exhausted(SliderEdge::First);
        }
        self.cursor = self.cursor.min(self.items.len() + 1) - 1;
        SlideOutcome::Moved(self.cursor)
    }
}
