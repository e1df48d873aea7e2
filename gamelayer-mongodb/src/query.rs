//! Query translation from gamelayer expressions to MongoDB query syntax.
//!
//! This module translates abstract query expressions into MongoDB BSON filter
//! documents for execution by the MongoDB query engine.

use bson::{Document, Bson, doc};

use gamelayer_core::{
    document::ID_FIELD,
    query::{QueryVisitor, Expr},
    error::DocumentStoreError,
};

/// Field MongoDB uses as primary key.
pub(crate) const MONGO_ID_FIELD: &str = "_id";


/// Maps a document field name to the name stored in MongoDB.
pub(crate) fn stored_field(field: &str) -> &str {
    if field == ID_FIELD { MONGO_ID_FIELD } else { field }
}

/// Translates gamelayer query expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        // MongoDB rejects an empty `$and`; an empty conjunction matches everything.
        if exprs.is_empty() {
            return Ok(doc! {});
        }

        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            stored_field(field): { "$eq": value.clone() },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamelayer_core::query::Filter;

    #[test]
    fn equality_becomes_eq_operator() {
        let translated = MongoQueryTranslator
            .visit_expr(&Filter::eq("series", "Discworld"))
            .unwrap();

        assert_eq!(translated, doc! { "series": { "$eq": "Discworld" } });
    }

    #[test]
    fn conjunction_becomes_and_operator() {
        let translated = MongoQueryTranslator
            .visit_expr(&Filter::eq("series", "Monkey Island").and(Filter::eq("release", 2_i64)))
            .unwrap();

        assert_eq!(
            translated,
            doc! {
                "$and": [
                    { "series": { "$eq": "Monkey Island" } },
                    { "release": { "$eq": 2_i64 } },
                ]
            }
        );
    }

    #[test]
    fn empty_conjunction_matches_everything() {
        let translated = MongoQueryTranslator
            .visit_expr(&Filter::and(Vec::new()))
            .unwrap();

        assert_eq!(translated, doc! {});
    }

    #[test]
    fn id_field_targets_primary_key() {
        let translated = MongoQueryTranslator
            .visit_expr(&Filter::eq("id", "0190f1a2-0000-7000-8000-000000000000"))
            .unwrap();

        assert_eq!(
            translated,
            doc! { "_id": { "$eq": "0190f1a2-0000-7000-8000-000000000000" } }
        );
    }
}
