use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::schema::ProfileData;

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: serde::Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load the profile, falling back to a fresh default when the file is
    /// missing, unparsable, or from a stale schema.
    pub fn load_profile(&self) -> ProfileData {
        let path = self.file_path("profile.json");
        let loaded = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<ProfileData>(&content).ok());
        match loaded {
            Some(profile) if !profile.needs_reset() => profile,
            _ => ProfileData::default(),
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save("profile.json", data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();

        let mut profile = ProfileData::default();
        profile.streak_days = 7;
        profile.best_streak = 12;
        profile.last_check_in = Some("2026-08-29".to_string());
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile();
        assert_eq!(loaded.streak_days, 7);
        assert_eq!(loaded.best_streak, 12);
        assert_eq!(loaded.last_check_in.as_deref(), Some("2026-08-29"));
    }

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let profile = store.load_profile();
        assert_eq!(profile.streak_days, 0);
        assert!(profile.last_check_in.is_none());
    }

    #[test]
    fn corrupt_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("profile.json"), "{not json").unwrap();
        assert_eq!(store.load_profile().streak_days, 0);
    }

    #[test]
    fn save_leaves_no_tmp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        store.save_profile(&ProfileData::default()).unwrap();
        assert!(dir.path().join("profile.json").exists());
        assert!(!dir.path().join("profile.tmp").exists());
    }
}
