//! The game record and the request shapes that create or change it.

use serde::{Deserialize, Serialize};

use gamelayer_core::document::DocumentId;
use gamelayer_macros::Document;

use crate::error::{GameError, GameResult};

/// A stored game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "games")]
pub struct Game {
    pub id: DocumentId,
    pub slug: String,
    pub genre: String,
    pub series: String,
    /// Installment number within the series.
    pub release: i64,
    #[document(unique)]
    pub title: String,
}

/// Every field of a game except its id, all present and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFields {
    pub slug: String,
    pub genre: String,
    pub series: String,
    pub release: i64,
    pub title: String,
}

/// Body of a create or full-replace request.
///
/// Fields are optional on the wire so a missing one surfaces as a validation error
/// instead of a decoding failure. Any `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameInput {
    pub slug: Option<String>,
    pub genre: Option<String>,
    pub series: Option<String>,
    pub release: Option<i64>,
    pub title: Option<String>,
}

impl GameInput {
    /// Checks that every field is present and no string is blank.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] naming every offending field.
    pub fn validate(self) -> GameResult<GameFields> {
        let mut missing = Vec::new();

        let slug = required_text("slug", self.slug, &mut missing);
        let genre = required_text("genre", self.genre, &mut missing);
        let series = required_text("series", self.series, &mut missing);
        let release = self.release;
        if release.is_none() {
            missing.push("release");
        }
        let title = required_text("title", self.title, &mut missing);

        match (slug, genre, series, release, title) {
            (Some(slug), Some(genre), Some(series), Some(release), Some(title)) if missing.is_empty() => {
                Ok(GameFields { slug, genre, series, release, title })
            }
            _ => Err(GameError::Validation(format!(
                "game validation failed: {} required",
                missing.join(", "),
            ))),
        }
    }
}

impl From<GameFields> for GameInput {
    fn from(fields: GameFields) -> Self {
        Self {
            slug: Some(fields.slug),
            genre: Some(fields.genre),
            series: Some(fields.series),
            release: Some(fields.release),
            title: Some(fields.title),
        }
    }
}

fn required_text(name: &'static str, value: Option<String>, missing: &mut Vec<&'static str>) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text),
        _ => {
            missing.push(name);
            None
        }
    }
}

/// Body of a partial update. Absent or `null` fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GamePatch {
    /// Rejects fields that are present but blank.
    pub fn validate(&self) -> GameResult<()> {
        let blank = [
            ("slug", &self.slug),
            ("genre", &self.genre),
            ("series", &self.series),
            ("title", &self.title),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|text| text.trim().is_empty()))
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(GameError::Validation(format!(
                "game validation failed: {} cannot be blank",
                blank.join(", "),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamelayer_core::document::Document as _;

    fn discworld() -> GameInput {
        GameInput {
            slug: Some("dw1".into()),
            genre: Some("Adventure".into()),
            series: Some("Discworld".into()),
            release: Some(1),
            title: Some("Discworld".into()),
        }
    }

    #[test]
    fn complete_input_validates() {
        let fields = discworld().validate().unwrap();

        assert_eq!(fields.slug, "dw1");
        assert_eq!(fields.release, 1);
    }

    #[test]
    fn every_missing_field_is_reported() {
        let input = GameInput { release: None, title: Some("  ".into()), ..discworld() };

        let GameError::Validation(message) = input.validate().unwrap_err() else {
            panic!("expected a validation error");
        };

        assert!(message.contains("release"));
        assert!(message.contains("title"));
        assert!(!message.contains("slug"));
    }

    #[test]
    fn input_ignores_body_id() {
        let input: GameInput = serde_json::from_value(serde_json::json!({
            "id": "whatever",
            "slug": "dw1",
            "genre": "Adventure",
            "series": "Discworld",
            "release": 1,
            "title": "Discworld",
        }))
        .unwrap();

        assert_eq!(input, discworld());
    }

    #[test]
    fn patch_treats_null_as_absent() {
        let patch: GamePatch = serde_json::from_value(serde_json::json!({ "title": "X", "slug": null })).unwrap();

        assert_eq!(patch, GamePatch { title: Some("X".into()), ..GamePatch::default() });
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn patch_rejects_blank_text() {
        let patch = GamePatch { series: Some("".into()), ..GamePatch::default() };

        assert!(matches!(patch.validate(), Err(GameError::Validation(_))));
    }

    #[test]
    fn game_declares_title_unique() {
        assert_eq!(Game::collection_name(), "games");
        assert_eq!(Game::unique_fields(), &["title"]);
    }
}
