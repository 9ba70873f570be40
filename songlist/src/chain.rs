use crate::Position;

/// Handle to a node slot in the chain's arena.
///
/// Slots are reused after removal, so a `Slot` is only meaningful while the
/// node it was issued for is still linked. `Queue` guarantees this by only
/// keeping slots in its position index and dropping them on unlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot(usize);

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) song: T,
    pub(crate) position: Position,
    prev: Option<Slot>,
    next: Option<Slot>,
}

/// Doubly linked chain of songs backed by a slot arena.
///
/// Links are `Slot` handles rather than references, so removal never leaves
/// dangling pointers: unlinking vacates the slot and pushes it on the free
/// list. Positions come from a monotonic counter and are never handed out
/// twice, even when the slot that carried them is reused.
#[derive(Debug)]
pub(crate) struct Chain<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<Slot>,
    head: Option<Slot>,
    tail: Option<Slot>,
    len: usize,
    next_position: u64,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            next_position: 0,
        }
    }
}

impl<T> Chain<T> {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn node(&self, slot: Slot) -> &Node<T> {
        self.slots[slot.0].as_ref().expect("slot is live")
    }

    fn node_mut(&mut self, slot: Slot) -> &mut Node<T> {
        self.slots[slot.0].as_mut().expect("slot is live")
    }

    fn alloc(&mut self, node: Node<T>) -> Slot {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot.0] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                Slot(self.slots.len() - 1)
            }
        }
    }

    /// Append a song after the current tail. O(1), never fails; duplicate
    /// songs are fine, each append gets a fresh position.
    pub(crate) fn push_back(&mut self, song: T) -> (Position, Slot) {
        let position = Position::new(self.next_position);
        self.next_position += 1;

        let slot = self.alloc(Node {
            song,
            position,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;

        (position, slot)
    }

    /// Unlink a live node, relinking its neighbors. O(1). The slot goes back
    /// on the free list; the caller must not use it afterwards.
    pub(crate) fn unlink(&mut self, slot: Slot) -> Node<T> {
        let node = self.slots[slot.0].take().expect("slot is live");

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }

        self.free.push(slot);
        self.len -= 1;
        node
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            curr: self.head,
        }
    }
}

pub(crate) struct Iter<'a, T> {
    chain: &'a Chain<T>,
    curr: Option<Slot>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Position, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chain.node(self.curr?);
        self.curr = node.next;
        Some((node.position, &node.song))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs<T>(chain: &Chain<T>) -> Vec<(u64, &T)> {
        chain.iter().map(|(p, s)| (p.get(), s)).collect()
    }

    #[test]
    fn push_back_links_in_order() {
        let mut chain = Chain::default();
        chain.push_back("a");
        chain.push_back("b");
        chain.push_back("c");

        assert_eq!(chain.len(), 3);
        assert_eq!(songs(&chain), vec![(0, &"a"), (1, &"b"), (2, &"c")]);
    }

    #[test]
    fn unlink_middle_relinks_neighbors() {
        let mut chain = Chain::default();
        chain.push_back("a");
        let (_, b) = chain.push_back("b");
        chain.push_back("c");

        let node = chain.unlink(b);
        assert_eq!(node.song, "b");
        assert_eq!(chain.len(), 2);
        assert_eq!(songs(&chain), vec![(0, &"a"), (2, &"c")]);
    }

    #[test]
    fn unlink_endpoints_moves_head_and_tail() {
        let mut chain = Chain::default();
        let (_, a) = chain.push_back("a");
        chain.push_back("b");
        let (_, c) = chain.push_back("c");

        chain.unlink(a);
        assert_eq!(songs(&chain), vec![(1, &"b"), (2, &"c")]);

        chain.unlink(c);
        assert_eq!(songs(&chain), vec![(1, &"b")]);
    }

    #[test]
    fn unlink_sole_node_empties_chain() {
        let mut chain = Chain::default();
        let (_, a) = chain.push_back("a");

        chain.unlink(a);
        assert_eq!(chain.len(), 0);
        assert!(chain.iter().next().is_none());
        assert_eq!(chain.head, None);
        assert_eq!(chain.tail, None);
    }

    #[test]
    fn slots_are_reused_but_positions_are_not() {
        let mut chain = Chain::default();
        let (p0, a) = chain.push_back("a");
        chain.unlink(a);
        let (p1, b) = chain.push_back("b");

        // same arena slot, fresh position
        assert_eq!(a, b);
        assert_eq!(p0.get(), 0);
        assert_eq!(p1.get(), 1);
    }

    #[test]
    fn forward_and_backward_walks_agree() {
        let mut chain = Chain::default();
        let slots: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|s| chain.push_back(s).1)
            .collect();
        chain.unlink(slots[1]);

        let forward: Vec<_> = chain.iter().map(|(p, _)| p).collect();

        let mut backward = Vec::new();
        let mut curr = chain.tail;
        while let Some(slot) = curr {
            let node = chain.node(slot);
            backward.push(node.position);
            curr = node.prev;
        }
        backward.reverse();

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), chain.len());
    }
}
