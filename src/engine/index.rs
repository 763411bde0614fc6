//! Secondary indexes created with `CREATE ORDERED|UNORDERED INDEX`.
//!
//! Indexes are maintained incrementally: every insert, update, and
//! delete updates every index touching a changed column, so a lookup
//! never has to fall back to a full scan to stay correct.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::ast::IndexKind;
use crate::engine::row::Row;
use crate::value::Value;

/// A single secondary index over one or more columns of a table.
#[derive(Debug, Clone)]
pub struct Index {
    /// The indexed column positions, in the order given to `CREATE INDEX`.
    pub columns: Vec<usize>,
    storage: Storage,
}

#[derive(Debug, Clone)]
enum Storage {
    /// Sorted by the stringified first column only.
    Ordered(BTreeMap<String, Vec<usize>>),
    /// Hashed on the pipe-joined stringification of every indexed column.
    Unordered(HashMap<String, HashSet<usize>>),
}

impl Index {
    /// Builds an empty index of the given kind over `columns`.
    #[must_use]
    pub fn new(kind: IndexKind, columns: Vec<usize>) -> Self {
        let storage = match kind {
            IndexKind::Ordered => Storage::Ordered(BTreeMap::new()),
            IndexKind::Unordered => Storage::Unordered(HashMap::new()),
        };
        Self { columns, storage }
    }

    /// The index's kind.
    #[must_use]
    pub const fn kind(&self) -> IndexKind {
        match self.storage {
            Storage::Ordered(_) => IndexKind::Ordered,
            Storage::Unordered(_) => IndexKind::Unordered,
        }
    }

    fn key_for(&self, row: &Row) -> String {
        match &self.storage {
            Storage::Ordered(_) => {
                let position = self.columns[0];
                row.get(position).map(Value::to_string).unwrap_or_default()
            }
            Storage::Unordered(_) => self
                .columns
                .iter()
                .filter_map(|&p| row.get(p))
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join("|"),
        }
    }

    /// Records that `row` now lives at `position`.
    pub fn insert(&mut self, position: usize, row: &Row) {
        let key = self.key_for(row);
        match &mut self.storage {
            Storage::Ordered(map) => map.entry(key).or_default().push(position),
            Storage::Unordered(map) => {
                map.entry(key).or_default().insert(position);
            }
        }
    }

    /// Removes the record of `row` living at `position`.
    pub fn remove(&mut self, position: usize, row: &Row) {
        let key = self.key_for(row);
        match &mut self.storage {
            Storage::Ordered(map) => {
                if let Some(positions) = map.get_mut(&key) {
                    positions.retain(|&p| p != position);
                    if positions.is_empty() {
                        map.remove(&key);
                    }
                }
            }
            Storage::Unordered(map) => {
                if let Some(positions) = map.get_mut(&key) {
                    positions.remove(&position);
                    if positions.is_empty() {
                        map.remove(&key);
                    }
                }
            }
        }
    }

    /// Rebuilds the index's view of a row whose indexed columns may
    /// have changed: removes the old key, inserts the new one.
    pub fn replace(&mut self, position: usize, old_row: &Row, new_row: &Row) {
        self.remove(position, old_row);
        self.insert(position, new_row);
    }

    /// `true` if any of `self.columns` is among `changed_positions`.
    #[must_use]
    pub fn touches(&self, changed_positions: &[usize]) -> bool {
        self.columns.iter().any(|c| changed_positions.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_index_keys_by_first_column_only() {
        let mut idx = Index::new(IndexKind::Ordered, vec![0]);
        let row = Row::new(vec![Value::Int(5), Value::Str("a".into())]);
        idx.insert(0, &row);
        assert_eq!(idx.key_for(&row), "5");
    }

    #[test]
    fn unordered_index_keys_by_all_columns() {
        let idx = Index::new(IndexKind::Unordered, vec![0, 1]);
        let row = Row::new(vec![Value::Int(5), Value::Str("a".into())]);
        assert_eq!(idx.key_for(&row), "5|a");
    }

    #[test]
    fn replace_moves_the_position_to_the_new_key() {
        let mut idx = Index::new(IndexKind::Unordered, vec![0]);
        let old_row = Row::new(vec![Value::Int(1)]);
        let new_row = Row::new(vec![Value::Int(2)]);
        idx.insert(0, &old_row);
        idx.replace(0, &old_row, &new_row);
        if let Storage::Unordered(map) = &idx.storage {
            assert!(!map.contains_key("1"));
            assert!(map.get("2").unwrap().contains(&0));
        } else {
            unreachable!()
        }
    }
}
