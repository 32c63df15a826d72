use crate::error::DatabaseResult;
use crate::repositories::{RosterRepository, UserRepository};
use crate::store::{collections, DocumentStore};
use log::info;
use scoring::{Roster, UserDocument};
use serde::Deserialize;
use std::sync::Arc;

const STATIC_DEMO_JSON: &str = include_str!("../data/demo.json");

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoEntity {
    pub user_id: String,
    pub user: UserDocument,
    pub roster: Roster,
    pub exercises: Vec<ExerciseEntity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntity {
    pub id: String,
    pub title: String,
    pub category: String,
    pub duration_minutes: u32,
}

pub struct DemoLoader;

impl DemoLoader {
    pub fn parse() -> serde_json::Result<DemoEntity> {
        serde_json::from_str(STATIC_DEMO_JSON)
    }

    /// Seeds the demo coach, their roster and the exercise library.
    pub async fn load(store: Arc<dyn DocumentStore>) -> DatabaseResult<String> {
        let demo = Self::parse()?;

        UserRepository::new(Arc::clone(&store))
            .put(&demo.user_id, &demo.user)
            .await?;

        RosterRepository::new(Arc::clone(&store))
            .put(&demo.user_id, &demo.roster)
            .await?;

        for exercise in &demo.exercises {
            let document = serde_json::json!({
                "title": exercise.title,
                "category": exercise.category,
                "durationMinutes": exercise.duration_minutes,
            });

            store.set(collections::EXERCISES, &exercise.id, document).await?;
        }

        info!(
            "demo data loaded: user {}, {} players, {} exercises",
            demo.user_id,
            demo.roster.players.len(),
            demo.exercises.len()
        );

        Ok(demo.user_id)
    }
}
