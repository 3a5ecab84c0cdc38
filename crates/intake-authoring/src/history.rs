use intake_core::models::Schema;

/// Linear undo history of schema snapshots.
///
/// `index` points at the live snapshot. Pushing after an undo drops the
/// redo tail. `clean` remembers which snapshot was last saved, so undoing
/// back to it clears the dirty flag.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Schema>,
    index: usize,
    clean: Option<usize>,
    limit: Option<usize>,
}

impl History {
    /// Start from `initial`, which counts as saved.
    pub fn new(initial: Schema, limit: Option<usize>) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            clean: Some(0),
            limit,
        }
    }

    /// Start from `initial`, which has never been saved.
    pub fn unsaved(initial: Schema, limit: Option<usize>) -> Self {
        Self {
            clean: None,
            ..Self::new(initial, limit)
        }
    }

    pub fn current(&self) -> &Schema {
        &self.snapshots[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn push(&mut self, schema: Schema) {
        self.snapshots.truncate(self.index + 1);
        if self.clean.is_some_and(|c| c > self.index) {
            self.clean = None;
        }
        self.snapshots.push(schema);
        self.index += 1;

        // `limit` counts undo steps, so keep one extra snapshot.
        if let Some(limit) = self.limit
            && self.snapshots.len() > limit + 1
        {
            let excess = self.snapshots.len() - (limit + 1);
            self.snapshots.drain(..excess);
            self.index -= excess;
            self.clean = self.clean.and_then(|c| c.checked_sub(excess));
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn mark_clean(&mut self) {
        self.clean = Some(self.index);
    }

    pub fn is_dirty(&self) -> bool {
        self.clean != Some(self.index)
    }
}
