//! Slot Arena Module
//!
//! A doubly-linked list stored in a dense vector of slots. Links are slot
//! indices rather than pointers, and vacated slots are recycled through a
//! free list, so every operation is O(1) without shared mutable aliasing.
//!
//! Orientation:
//! - Front = freshest (most recently used / most recently written)
//! - Back = stalest (next eviction candidate)

/// Sentinel index marking the absence of a link.
const NIL: usize = usize::MAX;

// == Slot ==
#[derive(Debug)]
struct Slot<T> {
    /// Payload, `None` while the slot sits on the free list
    item: Option<T>,
    /// Neighbour towards the front
    prev: usize,
    /// Neighbour towards the back; doubles as the free-list link
    next: usize,
}

// == Linked Arena ==
/// Ordered slot arena with O(1) insert, promote, and removal by index.
#[derive(Debug)]
pub struct LinkedArena<T> {
    slots: Vec<Slot<T>>,
    head: usize,
    tail: usize,
    free: usize,
    len: usize,
}

impl<T> LinkedArena<T> {
    // == Constructor ==
    /// Creates an empty arena with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Push Front ==
    /// Inserts `item` as the freshest element and returns its slot index.
    ///
    /// A vacated slot is reused when one is available.
    pub fn push_front(&mut self, item: T) -> usize {
        let idx = if self.free != NIL {
            let idx = self.free;
            self.free = self.slots[idx].next;
            self.slots[idx].item = Some(item);
            idx
        } else {
            self.slots.push(Slot {
                item: Some(item),
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        };

        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks an occupied slot as the freshest element.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == idx || !self.is_occupied(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Removes the element at `idx` and returns it, recycling the slot.
    ///
    /// Returns None if the slot is out of range or already vacant.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        let item = self.slots.get_mut(idx)?.item.take()?;
        self.unlink(idx);
        self.slots[idx].next = self.free;
        self.free = idx;
        self.len -= 1;
        Some(item)
    }

    // == Pop Back ==
    /// Removes and returns the stalest element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.tail == NIL {
            return None;
        }
        self.remove(self.tail)
    }

    /// Returns the stalest element without removing it.
    pub fn back(&self) -> Option<&T> {
        self.get(self.tail)
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx)?.item.as_ref()
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx)?.item.as_mut()
    }

    // == Clear ==
    /// Drops every element; allocated storage is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
        self.len = 0;
    }

    /// Iterates from freshest to stalest. Reverse with `.rev()`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn is_occupied(&self, idx: usize) -> bool {
        self.slots.get(idx).is_some_and(|slot| slot.item.is_some())
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }
}

// == Iterator ==
/// Borrowing iterator over arena elements, freshest first.
pub struct Iter<'a, T> {
    arena: &'a LinkedArena<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.arena.slots[self.front];
        self.front = slot.next;
        self.remaining -= 1;
        slot.item.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.arena.slots[self.back];
        self.back = slot.prev;
        self.remaining -= 1;
        slot.item.as_ref()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
