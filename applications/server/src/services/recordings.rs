/// Recording storage - uploaded audio and bundled sound files on disk
use crate::error::{Result, ServerError};
use chrono::{DateTime, SecondsFormat, Utc};
use mixtape_core::UserId;
use std::path::{Component, Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

const RECORDING_EXTENSION: &str = "ogg";
const SOUND_EXTENSION: &str = "mp3";

#[derive(Debug, Clone)]
pub struct RecordingStorage {
    audio_dir: PathBuf,
    sound_dir: PathBuf,
}

impl RecordingStorage {
    pub fn new(audio_dir: PathBuf, sound_dir: PathBuf) -> Self {
        Self {
            audio_dir,
            sound_dir,
        }
    }

    /// Create the recordings directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.audio_dir).await?;
        Ok(())
    }

    /// Name of a recording made by `user_id` at `at`, without extension
    pub fn recording_name(user_id: &UserId, at: DateTime<Utc>) -> String {
        format!(
            "{}-{}",
            user_id.as_str(),
            at.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }

    /// Write a new recording and flush it to disk.
    ///
    /// Returns the generated name. An existing file is never overwritten.
    pub async fn store_recording(&self, user_id: &UserId, data: &[u8]) -> Result<String> {
        let name = Self::recording_name(user_id, Utc::now());
        let path = self
            .audio_dir
            .join(format!("{}.{}", name, RECORDING_EXTENSION));

        if let Err(e) = write_new_file(&path, data).await {
            tracing::error!("Failed to write recording {:?}: {}", path, e);
            return Err(ServerError::Storage("Could not save recording".to_string()));
        }

        tracing::info!(
            user_id = %user_id,
            bytes = data.len(),
            "Stored recording {}",
            name
        );
        Ok(name)
    }

    /// Read a stored recording by the name `store_recording` returned
    pub async fn read_recording(&self, audio_id: &str) -> Result<Vec<u8>> {
        let path = resolve(&self.audio_dir, audio_id, RECORDING_EXTENSION).await?;
        Ok(fs::read(path).await?)
    }

    /// Read a bundled sound file by its stem
    pub async fn read_sound_file(&self, file: &str) -> Result<Vec<u8>> {
        let path = resolve(&self.sound_dir, file, SOUND_EXTENSION).await?;
        Ok(fs::read(path).await?)
    }
}

async fn write_new_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    let written = match file.write_all(data).await {
        Ok(()) => file.sync_all().await,
        Err(e) => Err(e),
    };
    drop(file);
    discard_partial(path, written).await
}

/// Remove a file this process created when filling it failed
async fn discard_partial(path: &Path, written: std::io::Result<()>) -> std::io::Result<()> {
    if written.is_err() {
        if let Err(e) = fs::remove_file(path).await {
            tracing::warn!("Failed to remove partial recording {:?}: {}", path, e);
        }
    }
    written
}

/// Resolve `{dir}/{stem}.{extension}`, rejecting anything that is not a
/// single plain file name or that escapes `dir`.
async fn resolve(dir: &Path, stem: &str, extension: &str) -> Result<PathBuf> {
    let file_name = format!("{}.{}", stem, extension);
    let mut components = Path::new(&file_name).components();

    let single_component = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if stem.is_empty() || !single_component {
        return Err(ServerError::BadRequest(format!("Invalid file name: {}", stem)));
    }

    let not_found = || ServerError::NotFound(format!("File not found: {}", file_name));

    let base = fs::canonicalize(dir).await.map_err(|_| not_found())?;
    let path = fs::canonicalize(dir.join(&file_name))
        .await
        .map_err(|_| not_found())?;

    if !path.starts_with(&base) {
        return Err(ServerError::BadRequest(format!("Invalid file name: {}", stem)));
    }

    Ok(path)
}
