//! A min-heap priority queue.
//!
//! Backs Huffman tree construction: entries are node handles keyed by
//! frequency, and the two lowest-frequency handles are popped on every merge.

#[derive(Debug, Clone)]
struct Slot<T> {
    key: u64,
    value: T,
}

/// Binary min-heap over `u64` keys.
///
/// Slot `i` has children `2i + 1` and `2i + 2`. Equal keys come out in
/// whatever order the sift operations leave them; callers that need a
/// deterministic result must push in a deterministic order.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    slots: Vec<Slot<T>>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            slots: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Key of the value `pop` would return next.
    pub fn peek_priority(&self) -> Option<u64> {
        self.slots.first().map(|slot| slot.key)
    }

    pub fn push(&mut self, priority: u64, data: T) {
        self.slots.push(Slot {
            key: priority,
            value: data,
        });
        self.sift_up(self.slots.len() - 1);
    }

    /// Remove and return the value with the smallest key.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.slots.len().checked_sub(1)?;
        self.slots.swap(0, last);
        let top = self.slots.pop()?;
        self.sift_down(0);
        Some(top.value)
    }

    /// True when no parent has a larger key than its children.
    pub fn is_heap(&self) -> bool {
        (1..self.slots.len()).all(|i| self.key(parent(i)) <= self.key(i))
    }

    fn key(&self, index: usize) -> u64 {
        self.slots[index].key
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 && self.key(parent(index)) > self.key(index) {
            self.slots.swap(index, parent(index));
            index = parent(index);
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                return;
            }
            let right = left + 1;
            let child = if right < len && self.key(right) < self.key(left) {
                right
            } else {
                left
            };
            if self.key(child) >= self.key(index) {
                return;
            }
            self.slots.swap(index, child);
            index = child;
        }
    }
}

fn parent(index: usize) -> usize {
    (index - 1) / 2
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
