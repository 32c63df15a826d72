use crate::error::{DatabaseError, DatabaseResult};
use crate::store::{ensure_object, merge_fields, DocumentStore};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const DOCUMENT_EXTENSION: &str = ".json.gz";

/// Stores each document as `<root>/<collection>/<id>.json.gz`.
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, collection: &str, id: &str) -> DatabaseResult<PathBuf> {
        validate_segment(collection)?;
        validate_segment(id)?;

        Ok(self
            .root
            .join(collection)
            .join(format!("{}{}", id, DOCUMENT_EXTENSION)))
    }

    async fn read(path: PathBuf) -> DatabaseResult<Option<Value>> {
        tokio::task::spawn_blocking(move || read_document(&path)).await?
    }

    async fn write(path: PathBuf, document: Value) -> DatabaseResult<()> {
        tokio::task::spawn_blocking(move || write_document(&path, &document)).await?
    }
}

fn validate_segment(segment: &str) -> DatabaseResult<()> {
    let valid = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\']);

    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidId(segment.to_string()))
    }
}

fn read_document(path: &Path) -> DatabaseResult<Option<Value>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let decoder = GzDecoder::new(BufReader::new(file));
    Ok(Some(serde_json::from_reader(decoder)?))
}

/// Writes to a temporary sibling and renames it over the target.
fn write_document(path: &Path, document: &Value) -> DatabaseResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    let file = File::create(&tmp_path)?;

    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, document)?;
    encoder.finish()?.flush()?;

    std::fs::rename(&tmp_path, path)?;

    debug!("document written: {}", path.display());

    Ok(())
}

#[async_trait]
impl DocumentStore for FileStore {
    fn backend_tag(&self) -> &'static str {
        "file"
    }

    async fn get(&self, collection: &str, id: &str) -> DatabaseResult<Option<Value>> {
        Self::read(self.document_path(collection, id)?).await
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> DatabaseResult<()> {
        ensure_object(&document)?;
        let path = self.document_path(collection, id)?;

        let _guard = self.write_lock.lock().await;
        Self::write(path, document).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> DatabaseResult<()> {
        let path = self.document_path(collection, id)?;

        let _guard = self.write_lock.lock().await;

        let mut document = Self::read(path.clone())
            .await?
            .ok_or_else(|| DatabaseError::not_found(collection, id))?;

        merge_fields(&mut document, fields)?;
        Self::write(path, document).await
    }

    async fn delete(&self, collection: &str, id: &str) -> DatabaseResult<bool> {
        let path = self.document_path(collection, id)?;

        let _guard = self.write_lock.lock().await;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, collection: &str) -> DatabaseResult<Vec<(String, Value)>> {
        validate_segment(collection)?;
        let dir = self.root.join(collection);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().to_string();

            let Some(id) = file_name.strip_suffix(DOCUMENT_EXTENSION) else {
                continue;
            };

            match Self::read(entry.path()).await {
                Ok(Some(document)) => documents.push((id.to_string(), document)),
                Ok(None) => {}
                Err(e) => warn!("skipping unreadable document {}: {}", entry.path().display(), e),
            }
        }

        documents.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_documents_survive_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();

        FileStore::new(dir.path())
            .set("partidos_estadisticas", "m1", json!({ "timerDuration": 20 }))
            .await
            .unwrap();

        let reopened = FileStore::new(dir.path());

        assert_eq!(
            reopened.get("partidos_estadisticas", "m1").await.unwrap(),
            Some(json!({ "timerDuration": 20 }))
        );
        assert!(dir.path().join("partidos_estadisticas/m1.json.gz").exists());
    }

    #[tokio::test]
    async fn test_update_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("c", "b", json!({ "n": 1 })).await.unwrap();
        store.set("c", "a", json!({ "n": 2 })).await.unwrap();

        let mut fields = Map::new();
        fields.insert("n".to_string(), json!(5));
        store.update("c", "b", fields).await.unwrap();

        let listed = store.list("c").await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].0, "a");
        assert_eq!(listed[1].1, json!({ "n": 5 }));
    }

    #[tokio::test]
    async fn test_missing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("c", "none").await.unwrap(), None);
        assert!(!store.delete("c", "none").await.unwrap());
        assert!(store.list("c").await.unwrap().is_empty());
        assert!(matches!(
            store.update("c", "none", Map::new()).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.get("c", "../secret").await,
            Err(DatabaseError::InvalidId(_))
        ));
        assert!(matches!(
            store.set("..", "x", json!({})).await,
            Err(DatabaseError::InvalidId(_))
        ));
    }
}
