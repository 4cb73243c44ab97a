use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::Query;
use crate::{DocId, Document};

/// Id-ordered document table shared by every backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    documents: BTreeMap<DocId, Document>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn next_id(&self) -> DocId {
        self.documents.keys().next_back().map_or(1, |last| last + 1)
    }

    pub fn insert(&mut self, document: Document) -> DocId {
        let id = self.next_id();
        self.documents.insert(id, document);
        id
    }

    pub fn search(&self, query: &Query) -> Vec<Document> {
        self.documents
            .values()
            .filter(|doc| query.matches(doc))
            .cloned()
            .collect()
    }

    pub fn update(&mut self, fields: &Document, query: &Query) -> Vec<DocId> {
        let mut changed = Vec::new();
        for (id, doc) in self.documents.iter_mut() {
            if query.matches(doc) {
                for (key, value) in fields {
                    doc.insert(key.clone(), value.clone());
                }
                changed.push(*id);
            }
        }
        changed
    }

    pub fn remove(&mut self, query: &Query) -> Vec<DocId> {
        let doomed: Vec<DocId> = self
            .documents
            .iter()
            .filter(|(_, doc)| query.matches(doc))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            self.documents.remove(id);
        }
        doomed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn ids_start_at_one_and_follow_the_maximum() {
        let mut t = Table::new();
        assert_eq!(t.insert(doc(json!({"a": 1}))), 1);
        assert_eq!(t.insert(doc(json!({"a": 2}))), 2);
        t.remove(&Query::field("a").eq(2));
        assert_eq!(t.insert(doc(json!({"a": 3}))), 2);
        t.remove(&Query::field("a").eq(1));
        assert_eq!(t.insert(doc(json!({"a": 4}))), 3);
    }

    #[test]
    fn update_merges_fields() {
        let mut t = Table::new();
        t.insert(doc(json!({"t_id": 0, "title": "old", "completed": false})));
        t.insert(doc(json!({"t_id": 1, "title": "other"})));

        let changed = t.update(&doc(json!({"title": "new"})), &Query::field("t_id").eq(0));
        assert_eq!(changed, vec![1]);

        let found = t.search(&Query::field("t_id").eq(0));
        assert_eq!(found[0]["title"], "new");
        assert_eq!(found[0]["completed"], false);
        assert_eq!(t.search(&Query::field("t_id").eq(1))[0]["title"], "other");
    }

    #[test]
    fn serializes_as_id_keyed_object() {
        let mut t = Table::new();
        t.insert(doc(json!({"name": "counter", "count": 0})));
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value, json!({"1": {"name": "counter", "count": 0}}));

        let back: Table = serde_json::from_str(&value.to_string()).unwrap();
        assert_eq!(back, t);
    }
}
