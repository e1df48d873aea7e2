//! CRUD operations over the games catalog.
//!
//! [`GameService`] validates requests, drives a typed collection over any
//! [`StoreBackend`] and translates storage failures into [`GameError`]s.

use rand::seq::IndexedRandom;

use gamelayer_core::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::DocumentId,
    query::Filter,
    store::DocumentStore,
};

use crate::{
    error::{GameError, GameResult},
    filter::GameFilter,
    game::{Game, GameInput, GamePatch},
};

/// The games resource service.
///
/// # Example
///
/// ```ignore
/// let service = GameService::new(DocumentStore::new(InMemoryStore::new())).await?;
/// let game = service.create_game(input).await?;
/// let same = service.get_game_by_id(&game.id.to_string()).await?;
/// ```
#[derive(Debug)]
pub struct GameService<B: StoreBackend> {
    store: DocumentStore<B>,
}

impl<B: StoreBackend> GameService<B> {
    /// Wraps `store`, creating the games collection and its unique title index.
    pub async fn new(store: DocumentStore<B>) -> GameResult<Self> {
        store.register::<Game>().await?;

        Ok(Self { store })
    }

    fn games(&self) -> TypedCollection<'_, B, Game> {
        self.store.typed_collection::<Game>()
    }

    /// Validates and stores a new game.
    ///
    /// # Errors
    ///
    /// [`GameError::Validation`] for an incomplete body and
    /// [`GameError::ConstraintViolation`] when the title is taken.
    pub async fn create_game(&self, input: GameInput) -> GameResult<Game> {
        let fields = input.validate()?;

        let game = self.games()
            .insert(vec![fields])
            .await?
            .pop()
            .ok_or_else(|| GameError::Storage("insert returned no record".into()))?;

        log::info!("created game {} ({})", game.id, game.title);

        Ok(game)
    }

    /// Validates every input before storing any of them.
    pub async fn create_games(&self, inputs: Vec<GameInput>) -> GameResult<Vec<Game>> {
        let fields = inputs
            .into_iter()
            .map(GameInput::validate)
            .collect::<GameResult<Vec<_>>>()?;

        if fields.is_empty() {
            return Ok(Vec::new());
        }

        let games = self.games().insert(fields).await?;

        log::info!("created {} games", games.len());

        Ok(games)
    }

    /// Looks a game up by id. An id that cannot be parsed names no game.
    pub async fn get_game_by_id(&self, id: &str) -> GameResult<Game> {
        self.games()
            .get(parse_id(id)?)
            .await?
            .ok_or_else(|| GameError::NotFound(id.to_string()))
    }

    /// Returns the first game, in insertion order, with this slug.
    pub async fn get_game_by_slug(&self, slug: &str) -> GameResult<Game> {
        self.games()
            .find_one(Some(Filter::eq("slug", slug)))
            .await?
            .ok_or_else(|| GameError::NotFound(slug.to_string()))
    }

    /// Picks a game uniformly at random.
    ///
    /// # Errors
    ///
    /// [`GameError::EmptyCollection`] when the catalog has no games.
    pub async fn get_random_game(&self) -> GameResult<Game> {
        let games = self.games().find_all(None).await?;

        games
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(GameError::EmptyCollection)
    }

    /// Lists the games matching `filter` in insertion order.
    pub async fn list_games(&self, filter: &GameFilter) -> GameResult<Vec<Game>> {
        Ok(self.games().find_all(filter.predicate()).await?)
    }

    /// Overwrites every field of an existing game. Never creates one.
    pub async fn replace_game(&self, id: &str, input: GameInput) -> GameResult<Game> {
        let fields = input.validate()?;
        let game = self.games().replace(parse_id(id)?, &fields).await?;

        log::info!("replaced game {}", game.id);

        Ok(game)
    }

    /// Overwrites only the fields present in `patch`.
    pub async fn merge_game(&self, id: &str, patch: GamePatch) -> GameResult<Game> {
        patch.validate()?;
        let game = self.games().merge(parse_id(id)?, &patch).await?;

        log::info!("updated game {}", game.id);

        Ok(game)
    }

    /// Deletes a game.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] when no game has this id.
    pub async fn delete_game(&self, id: &str) -> GameResult<()> {
        let game = self.games().delete(parse_id(id)?).await?;

        log::info!("deleted game {} ({})", game.id, game.title);

        Ok(())
    }

    /// Releases the underlying backend.
    pub async fn shutdown(self) -> GameResult<()> {
        Ok(self.store.shutdown().await?)
    }
}

fn parse_id(id: &str) -> GameResult<DocumentId> {
    id.parse().map_err(|_| GameError::NotFound(id.to_string()))
}
