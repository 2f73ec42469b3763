use std::path::{Path, PathBuf};
use std::sync::Arc;

use api::ScheduleApi;
use studysync_core::model::LearningPathId;
use tracing::info;

use crate::error::ExportError;

/// Downloads a path's schedule as an `.ics` file and saves it locally.
#[derive(Clone)]
pub struct CalendarExportService {
    schedule: Arc<dyn ScheduleApi>,
    download_dir: PathBuf,
}

impl CalendarExportService {
    #[must_use]
    pub fn new(schedule: Arc<dyn ScheduleApi>, download_dir: Option<PathBuf>) -> Self {
        Self {
            schedule,
            download_dir: resolve_download_dir(download_dir),
        }
    }

    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Fetch the calendar and write it into the download directory.
    ///
    /// Returns the path of the saved file.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Api` if the download fails, `Empty` for an empty
    /// body, or `Io` if the file cannot be written.
    pub async fn export(
        &self,
        learning_path_id: &LearningPathId,
        topic: &str,
    ) -> Result<PathBuf, ExportError> {
        let file = self.schedule.export_ics(learning_path_id).await?;
        if file.contents.is_empty() {
            return Err(ExportError::Empty);
        }
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let path = self.download_dir.join(file.file_name(topic));
        tokio::fs::write(&path, &file.contents).await?;
        info!(path = %path.display(), "calendar exported");
        Ok(path)
    }
}

/// Explicit directory, else the platform download folder, else the working directory.
#[must_use]
pub fn resolve_download_dir(configured: Option<PathBuf>) -> PathBuf {
    configured
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
