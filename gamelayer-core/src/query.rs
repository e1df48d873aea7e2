//! Query construction and filtering API for document stores.
//!
//! Predicates are small expression trees built with [`Filter`]:
//!
//! ```ignore
//! use gamelayer::query::{Query, Filter};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("series", "Monkey Island").and(Filter::eq("release", 2)))
//!     .limit(1)
//!     .build();
//! ```
//!
//! Backends consume expressions through the [`QueryVisitor`] trait: the in-memory
//! backend evaluates them against stored documents, the MongoDB backend translates
//! them into native filter documents.

use bson::Bson;

use crate::error::DocumentStoreError;

/// A filter expression for querying documents.
///
/// An empty [`Expr::And`] matches every document.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Exact equality of a field with a value.
    Eq {
        /// The field name to compare.
        field: String,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }
}

/// A structured query for retrieving documents.
///
/// Results always come back in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents. `None` matches everything.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// Creates a new empty query that matches every document.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Helper struct for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Creates an equality filter expression.
    ///
    /// Matches documents where the field equals the specified value. Numeric values
    /// compare by value regardless of their BSON width.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq { field: field.into(), value: value.into() }
    }

    /// Creates a logical AND filter expression.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder::default()
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets an optional filter expression, leaving the query unfiltered on `None`.
    pub fn filter_opt(mut self, filter: Option<Expr>) -> Self {
        self.query.filter = filter;
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Eq { field, value } => self.visit_eq(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens_into_existing_conjunction() {
        let expr = Filter::eq("series", "Discworld")
            .and(Filter::eq("release", 2))
            .and(Filter::eq("genre", "Adventure"));

        match expr {
            Expr::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn builder_keeps_filter_and_limit() {
        let query = Query::builder()
            .filter(Filter::eq("slug", "mi1"))
            .limit(1)
            .build();

        assert_eq!(query.limit, Some(1));
        assert_eq!(query.filter, Some(Filter::eq("slug", "mi1")));
    }

    #[test]
    fn filter_opt_none_matches_everything() {
        let query = Query::builder().filter_opt(None).build();

        assert!(query.filter.is_none());
        assert!(query.limit.is_none());
    }
}
