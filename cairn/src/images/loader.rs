//! Image discovery and idempotent loading.

use super::stamp::ImageStampTracker;
use super::store::ImageStore;
use cairn_shared::errors::{CairnError, CairnResult};
use std::io::ErrorKind;
use std::path::Path;

/// Names of entries in `images_dir` matching `pattern`, sorted.
///
/// A missing directory yields an empty list.
pub async fn find_images(images_dir: &Path, pattern: &str) -> CairnResult<Vec<String>> {
    tracing::debug!(dir = %images_dir.display(), pattern, "Looking for images");

    let matcher = glob::Pattern::new(pattern)
        .map_err(|e| CairnError::Config(format!("invalid image pattern '{pattern}': {e}")))?;

    let mut entries = match tokio::fs::read_dir(images_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(dir = %images_dir.display(), "Not loading images, directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(CairnError::Storage(format!(
                "failed to open images dir {}: {}",
                images_dir.display(),
                e
            )));
        }
    };

    let mut result = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        CairnError::Storage(format!(
            "failed to list images dir {}: {}",
            images_dir.display(),
            e
        ))
    })? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if matcher.matches(&name) {
            tracing::debug!(image = %name, "Found image archive");
            result.push(name);
        }
    }

    result.sort();
    Ok(result)
}

/// Load every unstamped image archive into `store`.
///
/// Stops at the first failure. Returns the number of archives loaded.
pub async fn load_images(
    store: &dyn ImageStore,
    tracker: &ImageStampTracker,
    images_dir: &Path,
    pattern: &str,
) -> CairnResult<usize> {
    let images = find_images(images_dir, pattern).await?;
    let mut loaded = 0;

    for image in images {
        if tracker.has_image(&image) {
            tracing::debug!(image = %image, "Image already loaded, skipping");
            continue;
        }

        let path = images_dir.join(&image);
        let input = tokio::fs::File::open(&path).await.map_err(|e| {
            CairnError::Storage(format!("failed to open {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Loading images");
        store.load_image(&image, Box::new(input)).await?;
        tracing::info!(path = %path.display(), "Done loading images");

        tracker.mark_loaded(&image)?;
        loaded += 1;
    }

    Ok(loaded)
}


#[cfg(test)]
mod tests {
    use super::test_store::RecordingStore;
    use super::*;
    use tempfile::TempDir;

    const PATTERN: &str = "images*.tar";

    fn images_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), format!("content of {name}")).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_find_images_filters_by_pattern() {
        let dir = images_dir(&["images.tar", "images-extra.tar", "readme.txt", "other.tar"]);
        let found = find_images(dir.path(), PATTERN).await.unwrap();
        assert_eq!(found, vec!["images-extra.tar", "images.tar"]);
    }

    #[tokio::test]
    async fn test_find_images_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let found = find_images(&dir.path().join("absent"), PATTERN)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_find_images_rejects_bad_pattern() {
        let dir = TempDir::new().unwrap();
        let err = find_images(dir.path(), "images[.tar").await.unwrap_err();
        assert!(matches!(err, CairnError::Config(_)));
    }

    #[tokio::test]
    async fn test_load_streams_content() {
        let dir = images_dir(&["images.tar"]);
        let stamps = TempDir::new().unwrap();
        let tracker = ImageStampTracker::new(stamps.path());
        let store = RecordingStore::default();

        let loaded = load_images(&store, &tracker, dir.path(), PATTERN)
            .await
            .unwrap();

        assert_eq!(loaded, 1);
        let loads = store.loads.lock().unwrap();
        assert_eq!(loads[0].0, "images.tar");
        assert_eq!(loads[0].1, b"content of images.tar");
        assert!(tracker.has_image("images.tar"));
    }

    #[tokio::test]
    async fn test_second_pass_is_idempotent() {
        let dir = images_dir(&["images.tar"]);
        let stamps = TempDir::new().unwrap();
        let tracker = ImageStampTracker::new(stamps.path());
        let store = RecordingStore::default();

        load_images(&store, &tracker, dir.path(), PATTERN)
            .await
            .unwrap();
        let loaded = load_images(&store, &tracker, dir.path(), PATTERN)
            .await
            .unwrap();

        assert_eq!(loaded, 0);
        assert_eq!(store.names(), vec!["images.tar"]);
    }

    #[tokio::test]
    async fn test_stamped_images_are_skipped() {
        let dir = images_dir(&["images.tar", "images-extra.tar"]);
        let stamps = TempDir::new().unwrap();
        let tracker = ImageStampTracker::new(stamps.path());
        tracker.mark_loaded("images.tar").unwrap();
        let store = RecordingStore::default();

        load_images(&store, &tracker, dir.path(), PATTERN)
            .await
            .unwrap();
        assert_eq!(store.names(), vec!["images-extra.tar"]);
    }

    #[tokio::test]
    async fn test_failure_stops_and_leaves_no_stamp() {
        let dir = images_dir(&["images-a.tar", "images-b.tar"]);
        let stamps = TempDir::new().unwrap();
        let tracker = ImageStampTracker::new(stamps.path());
        let store = RecordingStore {
            fail_on: Some("images-a.tar".into()),
            ..Default::default()
        };

        let err = load_images(&store, &tracker, dir.path(), PATTERN)
            .await
            .unwrap_err();
        assert!(matches!(err, CairnError::Step(_)));
        assert!(store.names().is_empty());
        assert!(!tracker.has_image("images-a.tar"));
        assert!(!tracker.has_image("images-b.tar"));
    }
}
