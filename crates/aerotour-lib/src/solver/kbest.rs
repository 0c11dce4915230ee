//! Bounded selection of the smallest keys seen in a stream.

/// Keeps the `cap` entries with the smallest keys ever inserted, in
/// ascending key order. Insertion is linear in `cap`, which stays small
/// everywhere this is used (neighbour lists, lower-bound tables).
pub(crate) struct KSmallest<T> {
    cap: usize,
    entries: Vec<(f32, T)>,
}

impl<T> KSmallest<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: Vec::with_capacity(cap),
        }
    }

    pub fn insert(&mut self, key: f32, value: T) {
        let position = self.entries.partition_point(|(k, _)| *k <= key);
        if position >= self.cap {
            return;
        }
        if self.entries.len() == self.cap {
            self.entries.pop();
        }
        self.entries.insert(position, (key, value));
    }

    pub fn into_entries(self) -> Vec<(f32, T)> {
        self.entries
    }
}
