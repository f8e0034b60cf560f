use std::cmp::Ordering;

/// Total ordering wrapper for `f32` priorities.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FloatOrd(pub f32);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Binary min-heap over dense slot numbers with decrease-key support.
///
/// `positions[slot]` tracks where each queued slot currently sits in `entries`
/// so a priority can be changed in place instead of pushing a duplicate.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    entries: Vec<(usize, FloatOrd)>,
    positions: Vec<Option<usize>>,
}

impl OpenSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn contains(&self, slot: usize) -> bool {
        matches!(self.positions.get(slot), Some(Some(_)))
    }

    /// Queue `slot`. A slot must not be pushed while it is still queued.
    pub(crate) fn push(&mut self, slot: usize, priority: f32) {
        debug_assert!(!self.contains(slot), "slot {slot} queued twice");
        if slot >= self.positions.len() {
            self.positions.resize(slot + 1, None);
        }
        let position = self.entries.len();
        self.entries.push((slot, FloatOrd(priority)));
        self.positions[slot] = Some(position);
        self.sift_up(position);
    }

    /// Remove and return the slot with the smallest priority.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let (slot, _) = self.entries.pop()?;
        self.positions[slot] = None;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(slot)
    }

    /// Change the priority of a queued slot. Returns `false` if it is not queued.
    pub(crate) fn update(&mut self, slot: usize, priority: f32) -> bool {
        let Some(Some(position)) = self.positions.get(slot).copied() else {
            return false;
        };
        let previous = self.entries[position].1;
        let next = FloatOrd(priority);
        self.entries[position].1 = next;
        if next < previous {
            self.sift_up(position);
        } else {
            self.sift_down(position);
        }
        true
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.positions[self.entries[a].0] = Some(a);
        self.positions[self.entries[b].0] = Some(b);
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.entries[position].1 >= self.entries[parent].1 {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut smallest = position;
            if left < len && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < len && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == position {
                break;
            }
            self.swap(position, smallest);
            position = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_priority_order() {
        let mut open = OpenSet::new();
        for (slot, priority) in [(0, 5.0), (1, 1.0), (2, 3.0), (3, 4.0), (4, 2.0)] {
            open.push(slot, priority);
        }
        assert_eq!(open.len(), 5);

        let order: Vec<_> = std::iter::from_fn(|| open.pop()).collect();
        assert_eq!(order, vec![1, 4, 2, 3, 0]);
        assert!(open.is_empty());
    }

    #[test]
    fn decrease_key_moves_slot_forward() {
        let mut open = OpenSet::new();
        open.push(0, 10.0);
        open.push(1, 20.0);
        open.push(2, 30.0);

        assert!(open.update(2, 5.0));
        assert_eq!(open.pop(), Some(2));
        assert!(!open.contains(2));
        assert_eq!(open.pop(), Some(0));
    }

    #[test]
    fn increase_key_moves_slot_back() {
        let mut open = OpenSet::new();
        open.push(0, 1.0);
        open.push(1, 2.0);
        open.push(2, 3.0);

        assert!(open.update(0, 9.0));
        let order: Vec<_> = std::iter::from_fn(|| open.pop()).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn update_ignores_slots_not_queued() {
        let mut open = OpenSet::new();
        assert!(!open.update(3, 1.0));
        open.push(3, 1.0);
        assert_eq!(open.pop(), Some(3));
        assert!(!open.update(3, 0.5));
        assert_eq!(open.pop(), None);
    }
}
