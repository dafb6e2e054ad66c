//! Lazy mounting of tab content.
//!
//! `MountTracker` remembers which tab positions have had their content
//! created. Mounting is one-way: a position, once mounted, stays mounted for
//! the life of the pager. Each first mount queues a [`LifecycleEvent`] that
//! the interactive context can drain.

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events produced by the mount tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Content for the tab at `position` was created.
    Mount { position: usize },
}

// ---------------------------------------------------------------------------
// MountTracker
// ---------------------------------------------------------------------------

/// Per-position mounted flags plus a queue of pending mount events.
#[derive(Debug, Clone)]
pub struct MountTracker {
    mounted: Vec<bool>,
    pending: Vec<LifecycleEvent>,
}

impl MountTracker {
    /// A tracker for `count` positions, none mounted.
    pub fn new(count: usize) -> Self {
        Self {
            mounted: vec![false; count],
            pending: Vec::new(),
        }
    }

    /// Mark `position` mounted. Returns `true` only on the first mount.
    ///
    /// Out-of-range positions are ignored.
    pub fn mount(&mut self, position: usize) -> bool {
        match self.mounted.get_mut(position) {
            Some(flag) if !*flag => {
                *flag = true;
                self.pending.push(LifecycleEvent::Mount { position });
                true
            }
            _ => false,
        }
    }

    pub fn is_mounted(&self, position: usize) -> bool {
        self.mounted.get(position).copied().unwrap_or(false)
    }

    /// Mounted positions in ascending order.
    pub fn mounted_positions(&self) -> Vec<usize> {
        self.mounted
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| m.then_some(i))
            .collect()
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.iter().filter(|&&m| m).count()
    }

    /// Number of positions tracked.
    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Drain pending events in the order they occurred.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unmounted() {
        let t = MountTracker::new(3);
        assert_eq!(t.len(), 3);
        assert_eq!(t.mounted_count(), 0);
        assert!(!t.is_mounted(0));
        assert!(!t.has_pending());
    }

    #[test]
    fn first_mount_only() {
        let mut t = MountTracker::new(3);
        assert!(t.mount(1));
        assert!(!t.mount(1));
        assert!(t.is_mounted(1));
        assert_eq!(
            t.pending_events(),
            vec![LifecycleEvent::Mount { position: 1 }]
        );
        assert!(t.pending_events().is_empty());
    }

    #[test]
    fn out_of_range_ignored() {
        let mut t = MountTracker::new(2);
        assert!(!t.mount(2));
        assert!(!t.is_mounted(2));
        assert!(!t.has_pending());
    }

    #[test]
    fn positions_sorted() {
        let mut t = MountTracker::new(4);
        t.mount(3);
        t.mount(0);
        assert_eq!(t.mounted_positions(), vec![0, 3]);
    }

    #[test]
    fn empty_tracker() {
        let mut t = MountTracker::new(0);
        assert!(t.is_empty());
        assert!(!t.mount(0));
    }
}
