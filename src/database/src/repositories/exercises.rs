use crate::error::DatabaseResult;
use crate::store::{collections, DocumentStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub duration_minutes: u32,
}

/// Read side of the exercise library.
#[derive(Clone)]
pub struct ExerciseRepository {
    store: Arc<dyn DocumentStore>,
}

impl ExerciseRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ExerciseRepository { store }
    }

    pub async fn list(&self) -> DatabaseResult<Vec<Exercise>> {
        self.store
            .list(collections::EXERCISES)
            .await?
            .into_iter()
            .map(|(id, value)| -> DatabaseResult<Exercise> {
                let mut exercise: Exercise = serde_json::from_value(value)?;
                exercise.id = id;
                Ok(exercise)
            })
            .collect()
    }

    pub async fn exists(&self, exercise_id: &str) -> DatabaseResult<bool> {
        Ok(self
            .store
            .get(collections::EXERCISES, exercise_id)
            .await?
            .is_some())
    }
}
