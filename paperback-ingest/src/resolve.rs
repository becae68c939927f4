//! Identity resolution for name-keyed lookup entities
//!
//! One table per entity class (author, publisher, language, genre,
//! authorRole). Keys are exact strings: no trimming, lower-casing, or fuzzy
//! matching, so "O'Reilly" and "O'reilly" stay distinct entities. That is a
//! known product decision, not an oversight.
//!
//! State is run-scoped and owned by the caller; tables are discarded and
//! rebuilt on every ingestion run.

use paperback_common::db::models::LookupRow;
use std::collections::HashMap;

/// Deduplicating name -> id table for one entity class
///
/// First occurrence of a name is assigned `id = len()`; later occurrences
/// reuse that id. Ids are never recycled within a run.
#[derive(Debug, Default)]
pub struct LookupTable {
    ids: HashMap<String, i64>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a name to its id, assigning the next id on first sight
    pub fn resolve(&mut self, name: &str) -> i64 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.ids.len() as i64;
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up without inserting
    pub fn get(&self, name: &str) -> Option<i64> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Materialize as rows, ordered by id
    pub fn into_rows(self) -> Vec<LookupRow> {
        let mut rows: Vec<LookupRow> = self
            .ids
            .into_iter()
            .map(|(name, id)| LookupRow { id, name })
            .collect();
        rows.sort_by_key(|r| r.id);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sight_assigns_sequential_ids() {
        let mut table = LookupTable::new();
        assert_eq!(table.resolve("Fiction"), 0);
        assert_eq!(table.resolve("Drama"), 1);
        assert_eq!(table.resolve("History"), 2);
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut table = LookupTable::new();
        let first = table.resolve("Gal Anonim");
        for _ in 0..10 {
            assert_eq!(table.resolve("Gal Anonim"), first);
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn keys_are_case_sensitive_exact_strings() {
        let mut table = LookupTable::new();
        let a = table.resolve("O'Reilly");
        let b = table.resolve("O'reilly");
        let c = table.resolve(" O'Reilly");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn rows_come_out_ordered_by_id() {
        let mut table = LookupTable::new();
        table.resolve("eng");
        table.resolve("pol");
        table.resolve("ger");

        let rows = table.into_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, 0);
        assert_eq!(rows[0].name, "eng");
        assert_eq!(rows[2].id, 2);
        assert_eq!(rows[2].name, "ger");
    }
}
