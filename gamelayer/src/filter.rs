//! Query-parameter filtering of the catalog.

use serde::Deserialize;

use gamelayer_core::query::{Expr, Filter};

/// Optional equality constraints on a listing. Only present fields constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameFilter {
    pub series: Option<String>,
    pub release: Option<i64>,
    pub genre: Option<String>,
}

impl GameFilter {
    /// Conjunction of the present constraints, or `None` to match everything.
    pub fn predicate(&self) -> Option<Expr> {
        let mut clauses = Vec::new();

        if let Some(series) = &self.series {
            clauses.push(Filter::eq("series", series.as_str()));
        }
        if let Some(release) = self.release {
            clauses.push(Filter::eq("release", release));
        }
        if let Some(genre) = &self.genre {
            clauses.push(Filter::eq("genre", genre.as_str()));
        }

        match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(Filter::and(clauses)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[test]
    fn no_parameters_match_everything() {
        assert!(GameFilter::default().predicate().is_none());
    }

    #[test]
    fn single_parameter_is_a_plain_equality() {
        let filter = GameFilter { series: Some("Discworld".into()), ..GameFilter::default() };

        assert_eq!(
            filter.predicate(),
            Some(Expr::Eq { field: "series".into(), value: Bson::String("Discworld".into()) })
        );
    }

    #[test]
    fn parameters_are_conjoined() {
        let filter = GameFilter {
            series: Some("Monkey Island".into()),
            release: Some(2),
            genre: None,
        };

        let Some(Expr::And(clauses)) = filter.predicate() else {
            panic!("expected a conjunction");
        };

        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1], Expr::Eq { field: "release".into(), value: Bson::Int64(2) });
    }
}
