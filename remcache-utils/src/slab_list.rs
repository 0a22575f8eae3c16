use std::iter::FusedIterator;

const NIL: usize = usize::MAX;

/// Stable handle of a node inside a [`SlabList`].
///
/// A handle stays valid until its node is removed. After that the slot may be
/// reused by a later push, so holders must drop handles of removed nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SlotId(usize);

enum Slot<T> {
    Occupied { value: T, prev: usize, next: usize },
    Vacant { next_free: usize },
}

/// Doubly-linked list whose nodes live in a `Vec` slab.
///
/// Links are slab indices instead of pointers, and vacated slots are chained
/// into a free list, so push/remove/move never allocate once the slab has
/// grown to its working size.
pub struct SlabList<T> {
    slots: Vec<Slot<T>>,
    free: usize,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Default for SlabList<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: NIL,
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }
}

impl<T> SlabList<T> {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            slots: Vec::with_capacity(cap),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push_front(&mut self, value: T) -> SlotId {
        let slot = Slot::Occupied {
            value,
            prev: NIL,
            next: NIL,
        };
        let idx = if self.free != NIL {
            let idx = self.free;
            if let Slot::Vacant { next_free } = self.slots[idx] {
                self.free = next_free;
            }
            self.slots[idx] = slot;
            idx
        } else {
            self.slots.push(slot);
            self.slots.len() - 1
        };

        self.link_front(idx);
        self.len += 1;
        SlotId(idx)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.is_occupied(id.0) {
            return None;
        }

        self.unlink(id.0);
        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        self.free = id.0;
        self.len -= 1;
        match std::mem::replace(&mut self.slots[id.0], vacant) {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Moves a node to the front. Returns `false` if `id` is not occupied.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.is_occupied(id.0) {
            return false;
        }
        if self.head != id.0 {
            self.unlink(id.0);
            self.link_front(id.0);
        }
        true
    }

    pub fn back_id(&self) -> Option<SlotId> {
        (self.tail != NIL).then_some(SlotId(self.tail))
    }

    pub fn back(&self) -> Option<&T> {
        self.back_id().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Iterates from front (most recently pushed or moved) to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn is_occupied(&self, idx: usize) -> bool {
        matches!(self.slots.get(idx), Some(Slot::Occupied { .. }))
    }

    fn links(&self, idx: usize) -> (usize, usize) {
        match self.slots[idx] {
            Slot::Occupied { prev, next, .. } => (prev, next),
            Slot::Vacant { .. } => (NIL, NIL),
        }
    }

    fn set_prev(&mut self, idx: usize, to: usize) {
        if let Slot::Occupied { prev, .. } = &mut self.slots[idx] {
            *prev = to;
        }
    }

    fn set_next(&mut self, idx: usize, to: usize) {
        if let Slot::Occupied { next, .. } = &mut self.slots[idx] {
            *next = to;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = self.links(idx);

        if prev == NIL {
            self.head = next;
        } else {
            self.set_next(prev, next);
        }

        if next == NIL {
            self.tail = prev;
        } else {
            self.set_prev(next, prev);
        }
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        self.set_prev(idx, NIL);
        self.set_next(idx, old_head);

        if old_head == NIL {
            self.tail = idx;
        } else {
            self.set_prev(old_head, idx);
        }
        self.head = idx;
    }
}

pub struct Iter<'a, T> {
    list: &'a SlabList<T>,
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
        let list = self.list;
        match &list.slots[self.front] {
            Slot::Occupied { value, next, .. } => {
                self.front = *next;
                self.remaining -= 1;
                Some(value)
            }
            Slot::Vacant { .. } => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        match &list.slots[self.back] {
            Slot::Occupied { value, prev, .. } => {
                self.back = *prev;
                self.remaining -= 1;
                Some(value)
            }
            Slot::Vacant { .. } => None,
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::Rng;

    use super::*;

    fn collect<T: Clone>(list: &SlabList<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    fn pop_back<T>(list: &mut SlabList<T>) -> Option<T> {
        list.back_id().and_then(|id| list.remove(id))
    }

    #[test]
    fn test_empty_list() {
        let mut list: SlabList<i32> = SlabList::default();
        assert!(list.is_empty());
        assert_eq!(list.back(), None);
        assert_eq!(list.back_id(), None);
        assert_eq!(pop_back(&mut list), None);
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_push_front_order() {
        let mut list = SlabList::default();
        for i in 0..5 {
            list.push_front(i);
        }
        assert_eq!(list.len(), 5);
        assert_eq!(collect(&list), vec![4, 3, 2, 1, 0]);
        assert_eq!(list.iter().rev().cloned().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(list.iter().next(), Some(&4));
        assert_eq!(list.back(), Some(&0));
    }

    #[test]
    fn test_move_to_front() {
        let mut list = SlabList::default();
        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        assert!(list.move_to_front(a));
        assert_eq!(collect(&list), vec!["a", "c", "b"]);

        assert!(list.move_to_front(b));
        assert_eq!(collect(&list), vec!["b", "a", "c"]);

        // already at front
        assert!(list.move_to_front(b));
        assert_eq!(collect(&list), vec!["b", "a", "c"]);
        assert_eq!(list.back_id(), Some(c));
    }

    #[test]
    fn test_remove_middle_head_tail() {
        let mut list = SlabList::default();
        let ids: Vec<_> = (0..5).map(|i| list.push_front(i)).collect();

        assert_eq!(list.remove(ids[2]), Some(2));
        assert_eq!(collect(&list), vec![4, 3, 1, 0]);
        assert_eq!(list.remove(ids[4]), Some(4));
        assert_eq!(list.remove(ids[0]), Some(0));
        assert_eq!(collect(&list), vec![3, 1]);
        assert_eq!(list.iter().next(), Some(&3));
        assert_eq!(list.back(), Some(&1));

        // double remove is a no-op
        assert_eq!(list.remove(ids[2]), None);
        assert!(!list.move_to_front(ids[2]));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = SlabList::with_capacity(2);
        let a = list.push_front(1);
        let _b = list.push_front(2);
        assert_eq!(pop_back(&mut list), Some(1));

        let c = list.push_front(3);
        assert_eq!(c, a);
        assert_eq!(list.slots.len(), 2);
        assert_eq!(collect(&list), vec![3, 2]);
    }

    #[test]
    fn test_get_mut() {
        let mut list = SlabList::default();
        let id = list.push_front(1);
        if let Some(v) = list.get_mut(id) {
            *v = 10;
        }
        assert_eq!(list.get(id), Some(&10));
        list.remove(id);
        assert_eq!(list.get_mut(id), None);
    }

    #[test]
    fn test_matches_vecdeque_model() {
        let mut rng = rand::rng();
        let mut list = SlabList::default();
        let mut model: VecDeque<(SlotId, u32)> = VecDeque::new();

        for step in 0..10_000u32 {
            match rng.random_range(0..4) {
                0 | 1 => {
                    let id = list.push_front(step);
                    model.push_front((id, step));
                }
                2 if !model.is_empty() => {
                    let pos = rng.random_range(0..model.len());
                    let (id, v) = model.remove(pos).unwrap();
                    assert_eq!(list.remove(id), Some(v));
                }
                3 if !model.is_empty() => {
                    let pos = rng.random_range(0..model.len());
                    let item = model.remove(pos).unwrap();
                    assert!(list.move_to_front(item.0));
                    model.push_front(item);
                }
                _ => {
                    assert_eq!(pop_back(&mut list), model.pop_back().map(|(_, v)| v));
                }
            }

            assert_eq!(list.len(), model.len());
        }

        let expected: Vec<_> = model.iter().map(|(_, v)| *v).collect();
        assert_eq!(collect(&list), expected);
    }
}
