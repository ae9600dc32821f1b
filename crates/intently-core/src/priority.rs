//! Explicit execution order for extractors and skills.
//!
//! Each entry carries a numeric priority (lower runs first). Among equal
//! priorities, entries added with [`PriorityList::insert`] keep registration
//! order, while [`PriorityList::prepend`] always lands strictly ahead of every
//! entry already in the list.

/// Priority given to entries registered without an explicit one.
pub const DEFAULT_PRIORITY: i32 = 0;

/// One named entry in a [`PriorityList`].
#[derive(Debug)]
pub struct Entry<T> {
    name: String,
    priority: i32,
    seq: i64,
    item: T,
}

impl<T> Entry<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn item(&self) -> &T {
        &self.item
    }
}

/// Named items kept sorted by `(priority, registration sequence)`.
#[derive(Debug)]
pub struct PriorityList<T> {
    entries: Vec<Entry<T>>,
    next_back: i64,
    next_front: i64,
}

impl<T> PriorityList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_back: 0,
            next_front: -1,
        }
    }

    /// Add an item with an explicit priority, after existing equals.
    pub fn insert(&mut self, name: impl Into<String>, priority: i32, item: T) {
        let seq = self.next_back;
        self.next_back += 1;
        self.push_sorted(Entry {
            name: name.into(),
            priority,
            seq,
            item,
        });
    }

    /// Add an item with the default priority, after existing equals.
    pub fn push(&mut self, name: impl Into<String>, item: T) {
        self.insert(name, DEFAULT_PRIORITY, item);
    }

    /// Add an item ahead of every entry currently in the list.
    pub fn prepend(&mut self, name: impl Into<String>, item: T) {
        let priority = self
            .entries
            .first()
            .map_or(DEFAULT_PRIORITY, |first| first.priority.min(DEFAULT_PRIORITY));
        let seq = self.next_front;
        self.next_front -= 1;
        self.push_sorted(Entry {
            name: name.into(),
            priority,
            seq,
            item,
        });
    }

    /// Remove the first entry with the given name.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let index = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(index).item)
    }

    /// Entries in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    /// Entry names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push_sorted(&mut self, entry: Entry<T>) {
        let key = (entry.priority, entry.seq);
        let index = self
            .entries
            .partition_point(|existing| (existing.priority, existing.seq) < key);
        self.entries.insert(index, entry);
    }
}

impl<T> Default for PriorityList<T> {
    fn default() -> Self {
        Self::new()
    }
}
