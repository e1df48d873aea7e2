//! The sample catalog loaded with `--seed`.

use gamelayer::{
    backend::StoreBackend,
    error::GameResult,
    filter::GameFilter,
    game::{GameFields, GameInput},
    service::GameService,
};

const SAMPLE_GENRE: &str = "Adventure";

const SAMPLE_GAMES: [(&str, &str, i64, &str); 11] = [
    ("mi1", "Monkey Island", 1, "Monkey Island 1: The Secret of Monkey Island"),
    ("mi2", "Monkey Island", 2, "Monkey Island 2: LeChuck's Revenge"),
    ("mi3", "Monkey Island", 3, "Monkey Island 3: The Curse of Monkey Island"),
    ("mi4", "Monkey Island", 4, "Monkey Island 4: Escape from Monkey Island"),
    ("mi5", "Monkey Island", 5, "Monkey Island 5: Tales of Monkey Island"),
    ("dw1", "Discworld", 1, "Discworld"),
    ("dw2", "Discworld", 2, "Discworld II: Missing, Presumed..."),
    ("dw3", "Discworld", 3, "Discworld Noir"),
    ("gk1", "Gabriel Knight", 1, "Gabriel Knight 1: Sins of the Father"),
    ("gk2", "Gabriel Knight", 2, "Gabriel Knight 2: The Beast Within"),
    ("gk3", "Gabriel Knight", 3, "Gabriel Knight 3: Blood of the Sacred, Blood of the Damned"),
];

pub fn sample_games() -> Vec<GameInput> {
    SAMPLE_GAMES
        .iter()
        .map(|(slug, series, release, title)| {
            GameFields {
                slug: slug.to_string(),
                genre: SAMPLE_GENRE.to_string(),
                series: series.to_string(),
                release: *release,
                title: title.to_string(),
            }
            .into()
        })
        .collect()
}

/// Loads the sample catalog unless the store already holds games.
///
/// Returns how many games were inserted.
pub async fn seed_catalog<B: StoreBackend>(service: &GameService<B>) -> GameResult<usize> {
    if !service.list_games(&GameFilter::default()).await?.is_empty() {
        log::info!("catalog already populated; skipping sample data");
        return Ok(0);
    }

    let inserted = service.create_games(sample_games()).await?.len();
    log::info!("seeded {inserted} sample games");

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamelayer::{memory::InMemoryStore, store::DocumentStore};

    #[tokio::test]
    async fn seeding_is_skipped_when_populated() {
        let service = GameService::new(DocumentStore::new(InMemoryStore::new())).await.unwrap();

        assert_eq!(seed_catalog(&service).await.unwrap(), SAMPLE_GAMES.len());
        assert_eq!(seed_catalog(&service).await.unwrap(), 0);
        assert_eq!(
            service.list_games(&GameFilter::default()).await.unwrap().len(),
            SAMPLE_GAMES.len()
        );
    }
}
