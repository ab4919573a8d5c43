use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bible::Verse;

const FAVORITES_FILE_NAME: &str = ".verse_favorites.json";

/// A bookmarked verse. Same shape as the verse it was saved from.
pub type Favorite = Verse;

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("could not write favorites to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Favorites persisted as a pretty-printed JSON array. Every read loads the
/// whole file and every mutation rewrites it.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files yield an empty list.
    pub fn load(&self) -> Vec<Favorite> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no favorites file");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt favorites file");
                Vec::new()
            }
        }
    }

    pub fn save(&self, favorites: &[Favorite]) -> Result<(), FavoritesError> {
        let content = serde_json::to_string_pretty(favorites)?;
        fs::write(&self.path, content).map_err(|source| FavoritesError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = favorites.len(), "favorites written");
        Ok(())
    }

    pub fn add(&self, verse: &Verse) -> Result<AddOutcome, FavoritesError> {
        let mut favorites = self.load();
        let key = verse.reference.to_lowercase();

        if favorites.iter().any(|f| f.reference.to_lowercase() == key) {
            return Ok(AddOutcome::AlreadyExists);
        }

        favorites.push(verse.clone());
        self.save(&favorites)?;
        info!(reference = %verse.reference, "favorite added");
        Ok(AddOutcome::Added)
    }

    pub fn remove(&self, reference: &str) -> Result<RemoveOutcome, FavoritesError> {
        let mut favorites = self.load();
        let initial_len = favorites.len();
        let key = reference.to_lowercase();

        favorites.retain(|f| f.reference.to_lowercase() != key);

        if favorites.len() < initial_len {
            self.save(&favorites)?;
            info!(reference, "favorite removed");
            Ok(RemoveOutcome::Removed)
        } else {
            Ok(RemoveOutcome::NotFound)
        }
    }
}

/// `$HOME`, then `$USERPROFILE`, then the directory holding the executable.
pub fn default_favorites_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));

    resolve_favorites_path(
        std::env::var_os("HOME"),
        std::env::var_os("USERPROFILE"),
        exe_dir,
    )
}

fn resolve_favorites_path(
    home: Option<OsString>,
    user_profile: Option<OsString>,
    exe_dir: Option<PathBuf>,
) -> PathBuf {
    let base = home
        .filter(|h| !h.is_empty())
        .or_else(|| user_profile.filter(|p| !p.is_empty()))
        .map(PathBuf::from)
        .or(exe_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(FAVORITES_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn verse(reference: &str, text: &str) -> Verse {
        Verse {
            reference: reference.to_string(),
            translation: "World English Bible".to_string(),
            text: text.to_string(),
        }
    }

    fn store_in(dir: &TempDir) -> FavoritesStore {
        FavoritesStore::new(dir.path().join(FAVORITES_FILE_NAME))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[{\"reference\": \"John 3:16\", \"tra").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let first = store.add(&verse("John 3:16", "For God so loved the world")).unwrap();
        assert_eq!(first, AddOutcome::Added);
        let before = fs::read(store.path()).unwrap();

        let second = store.add(&verse("JOHN 3:16", "different text")).unwrap();
        assert_eq!(second, AddOutcome::AlreadyExists);
        assert_eq!(fs::read(store.path()).unwrap(), before);

        let favorites = store.load();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].reference, "John 3:16");
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(&verse("Genesis 1:1", "In the beginning")).unwrap();
        store.add(&verse("John 1:1", "In the beginning was the Word")).unwrap();
        store.add(&verse("Psalms 23:1", "The LORD is my shepherd")).unwrap();

        let refs: Vec<String> = store.load().into_iter().map(|f| f.reference).collect();
        assert_eq!(refs, vec!["Genesis 1:1", "John 1:1", "Psalms 23:1"]);
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(&verse("John 3:16", "For God so loved the world")).unwrap();
        store.add(&verse("Romans 8:28", "All things work together")).unwrap();

        assert_eq!(store.remove("john 3:16").unwrap(), RemoveOutcome::Removed);

        let favorites = store.load();
        assert_eq!(favorites.len(), 1);
        assert!(favorites.iter().all(|f| f.reference.to_lowercase() != "john 3:16"));
    }

    #[test]
    fn test_remove_missing_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(&verse("Romans 8:28", "All things work together")).unwrap();
        let before = fs::read(store.path()).unwrap();

        assert_eq!(store.remove("john 3:16").unwrap(), RemoveOutcome::NotFound);
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_remove_on_missing_file_does_not_create_it() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.remove("john 3:16").unwrap(), RemoveOutcome::NotFound);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_of_loaded_list_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(&verse("John 3:16", "For God so loved the world")).unwrap();
        store.add(&verse("1 Thessalonians 1:2", "We always give thanks")).unwrap();
        let before = fs::read(store.path()).unwrap();

        let loaded = store.load();
        store.save(&loaded).unwrap();

        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn test_saved_file_uses_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(&verse("John 3:16", "For God so loved the world")).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("[\n  {\n    \"reference\": \"John 3:16\""));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = FavoritesStore::new(dir.path().join("missing").join(FAVORITES_FILE_NAME));
        let err = store.add(&verse("John 3:16", "text")).unwrap_err();
        assert!(matches!(err, FavoritesError::Write { .. }));
    }

    #[test]
    fn test_resolve_path_prefers_home() {
        let path = resolve_favorites_path(
            Some(OsString::from("/home/reader")),
            Some(OsString::from("C:\\Users\\reader")),
            Some(PathBuf::from("/opt/bible")),
        );
        assert_eq!(path, PathBuf::from("/home/reader").join(FAVORITES_FILE_NAME));
    }

    #[test]
    fn test_resolve_path_falls_back_to_user_profile_then_exe_dir() {
        let path = resolve_favorites_path(None, Some(OsString::from("/profiles/reader")), None);
        assert_eq!(path, PathBuf::from("/profiles/reader").join(FAVORITES_FILE_NAME));

        let path = resolve_favorites_path(Some(OsString::new()), None, Some(PathBuf::from("/opt/bible")));
        assert_eq!(path, PathBuf::from("/opt/bible").join(FAVORITES_FILE_NAME));
    }
}
