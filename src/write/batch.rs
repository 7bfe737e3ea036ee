use std::collections::BTreeMap;

use crate::{
    client::{Column, ColumnOrSuperColumn, Deletion, Mutation, MutationMap, SuperColumn},
    util::Slice,
};

/// MutationBatch accumulates the mutations of one logical write, grouped per
/// row key and column family, so they can be sent as a single atomic
/// `batch_write`.
#[derive(Debug, Clone)]
pub struct MutationBatch {
    mutations: MutationMap,
    /// Number of mutations
    count: usize,
    /// Columns and sub-columns inserted
    column_count: usize,
    /// Approximate payload size in bytes
    data_size: usize,
}

impl MutationBatch {
    #[inline]
    pub fn new() -> Self {
        MutationBatch {
            mutations: BTreeMap::new(),
            count: 0,
            column_count: 0,
            data_size: 0,
        }
    }

    /// Append a mutation to the list of `key` in `column_family`.
    pub fn add(&mut self, key: Slice, column_family: &str, mutation: Mutation) {
        match &mutation {
            Mutation::Insert(ColumnOrSuperColumn::Column(c)) => {
                self.column_count += 1;
                self.data_size += c.name.size() + c.value.size();
            },
            Mutation::Insert(ColumnOrSuperColumn::SuperColumn(sc)) => {
                self.column_count += sc.columns.len();
                self.data_size += sc.name.size()
                    + sc.columns
                        .iter()
                        .map(|c| c.name.size() + c.value.size())
                        .sum::<usize>();
            },
            Mutation::Delete(_) => {},
        }
        self.data_size += key.size();
        self.count += 1;
        self.mutations
            .entry(key)
            .or_default()
            .entry(column_family.to_string())
            .or_default()
            .push(mutation);
    }

    pub fn put_column(&mut self, key: Slice, column_family: &str, column: Column) {
        self.add(key, column_family, Mutation::column(column));
    }

    pub fn put_super_column(&mut self, key: Slice, column_family: &str, super_column: SuperColumn) {
        self.add(key, column_family, Mutation::super_column(super_column));
    }

    pub fn delete(&mut self, key: Slice, column_family: &str, deletion: Deletion) {
        self.add(key, column_family, Mutation::Delete(deletion));
    }

    /// Mutations queued for `key` in `column_family`, in insertion order.
    pub fn mutations_for(&self, key: &Slice, column_family: &str) -> Option<&[Mutation]> {
        self.mutations
            .get(key)?
            .get(column_family)
            .map(Vec::as_slice)
    }

    #[inline]
    pub fn contains_key(&self, key: &Slice) -> bool {
        self.mutations.contains_key(key)
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[inline]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.mutations.clear();
        self.count = 0;
        self.column_count = 0;
        self.data_size = 0;
    }

    #[inline]
    pub fn mutations(&self) -> &MutationMap {
        &self.mutations
    }

    pub fn into_mutation_map(self) -> MutationMap {
        self.mutations
    }
}

impl Default for MutationBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_batch_basic() {
        let mut batch = MutationBatch::new();
        assert!(batch.is_empty());

        batch.put_column(Slice::from("u1"), "users", Column::new("name", "Alice", 10));
        batch.put_column(Slice::from("u1"), "users", Column::new("email", "a@x", 10));
        batch.put_column(Slice::from("u2"), "users", Column::new("name", "Bob", 10));

        assert_eq!(batch.count(), 3);
        assert_eq!(batch.column_count(), 3);
        assert!(batch.contains_key(&Slice::from("u1")));
        assert!(!batch.contains_key(&Slice::from("u3")));
        assert_eq!(batch.mutations().len(), 2);
        assert_eq!(
            batch
                .mutations_for(&Slice::from("u1"), "users")
                .map(|m| m.len()),
            Some(2)
        );
    }

    #[test]
    fn test_mutation_batch_keeps_insertion_order() {
        let mut batch = MutationBatch::new();
        batch.put_column(Slice::from("k"), "cf", Column::new("b", "2", 1));
        batch.put_column(Slice::from("k"), "cf", Column::new("a", "1", 1));

        let list = batch.mutations_for(&Slice::from("k"), "cf").unwrap();
        assert_eq!(list[0], Mutation::column(Column::new("b", "2", 1)));
        assert_eq!(list[1], Mutation::column(Column::new("a", "1", 1)));
    }

    #[test]
    fn test_mutation_batch_super_columns() {
        let mut batch = MutationBatch::new();
        batch.put_super_column(
            Slice::from("u1"),
            "profiles",
            SuperColumn::new(
                "home",
                vec![Column::new("city", "Oslo", 1), Column::new("zip", "0150", 1)],
            ),
        );
        assert_eq!(batch.count(), 1);
        assert_eq!(batch.column_count(), 2);
        // key + super-column name + two name/value pairs
        assert_eq!(batch.data_size(), 2 + 4 + (4 + 4) + (3 + 4));
    }

    #[test]
    fn test_mutation_batch_deletions() {
        let mut batch = MutationBatch::new();
        batch.delete(
            Slice::from("u1"),
            "users",
            Deletion {
                timestamp: 5,
                super_column: None,
                predicate: None,
            },
        );
        assert_eq!(batch.count(), 1);
        assert_eq!(batch.column_count(), 0);
        assert_eq!(batch.data_size(), 2);
    }

    #[test]
    fn test_mutation_batch_clear() {
        let mut batch = MutationBatch::new();
        batch.put_column(Slice::from("u1"), "users", Column::new("name", "Alice", 1));
        batch.clear();

        assert!(batch.is_empty());
        assert_eq!(batch.data_size(), 0);
        assert!(batch.into_mutation_map().is_empty());
    }
}
