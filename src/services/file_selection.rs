use bytes::Bytes;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::services::notifier::{Notification, Notifier};

pub const INVALID_FORMAT_TITLE: &str = "Invalid file format";
pub const UPLOAD_HINT: &str = "Please upload a CSV or Excel file";
pub const READ_FAILED_TITLE: &str = "Could not read file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileExtension {
    Csv,
    Xlsx,
}

impl FileExtension {
    /// Case-sensitive suffix match: `data.CSV` is rejected.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".csv") {
            Some(FileExtension::Csv)
        } else if name.ends_with(".xlsx") {
            Some(FileExtension::Xlsx)
        } else {
            None
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FileExtension::Csv => "text/csv",
            FileExtension::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileExtension::Csv => write!(f, "csv"),
            FileExtension::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// A file staged for submission. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    name: String,
    extension: FileExtension,
    contents: Bytes,
}

impl UploadCandidate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> FileExtension {
        self.extension
    }

    pub fn size_bytes(&self) -> u64 {
        self.contents.len() as u64
    }

    /// Size in binary megabytes, formatted to two decimals.
    pub fn size_megabytes(&self) -> String {
        format!("{:.2}", self.size_bytes() as f64 / 1024.0 / 1024.0)
    }

    pub fn mime_type(&self) -> &'static str {
        self.extension.mime_type()
    }

    pub fn contents(&self) -> &Bytes {
        &self.contents
    }
}

pub struct FileSelection {
    current: Option<UploadCandidate>,
    notifier: Arc<dyn Notifier>,
}

impl FileSelection {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            current: None,
            notifier,
        }
    }

    pub fn current(&self) -> Option<&UploadCandidate> {
        self.current.as_ref()
    }

    pub fn select(
        &mut self,
        name: impl Into<String>,
        contents: impl Into<Bytes>,
    ) -> Result<UploadCandidate, PipelineError> {
        let name = name.into();

        let Some(extension) = FileExtension::from_name(&name) else {
            tracing::warn!(file = %name, "Rejected file with unsupported extension");
            self.notifier
                .notify(Notification::destructive(INVALID_FORMAT_TITLE, UPLOAD_HINT));
            return Err(PipelineError::validation(format!(
                "Unsupported file type: {}. {}",
                name, UPLOAD_HINT
            )));
        };

        let candidate = UploadCandidate {
            name,
            extension,
            contents: contents.into(),
        };

        tracing::info!(
            file = %candidate.name,
            size_bytes = candidate.size_bytes(),
            extension = %candidate.extension,
            "File selected"
        );
        self.notifier.notify(Notification::info(
            "File selected",
            format!("{} ({} MB)", candidate.name, candidate.size_megabytes()),
        ));

        self.current = Some(candidate.clone());
        Ok(candidate)
    }

    /// Reads a file from disk and selects it under its file name.
    ///
    /// A path that cannot be read is reported like a rejected selection: a
    /// destructive notification, a `Validation` error and the held candidate
    /// left in place.
    pub async fn select_path(&mut self, path: &Path) -> Result<UploadCandidate, PipelineError> {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Err(self.read_failed(format!("Not a file: {}", path.display()))),
        };

        // Check the extension before reading so a rejected file costs no I/O.
        if FileExtension::from_name(&name).is_none() {
            return self.select(name, Bytes::new());
        }

        match tokio::fs::read(path).await {
            Ok(contents) => self.select(name, contents),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read selected file");
                Err(self.read_failed(format!("Failed to read {}: {}", path.display(), e)))
            }
        }
    }

    fn read_failed(&self, message: String) -> PipelineError {
        self.notifier
            .notify(Notification::destructive(READ_FAILED_TITLE, message.clone()));
        PipelineError::validation(message)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifier::{ChannelNotifier, NotificationKind};
    use tokio::sync::mpsc;

    fn selection() -> (FileSelection, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (FileSelection::new(Arc::new(ChannelNotifier::new(tx))), rx)
    }

    #[test]
    fn accepts_csv_and_xlsx() {
        let (mut selection, mut rx) = selection();

        let candidate = selection.select("people.csv", vec![0u8; 3 * 1024 * 1024]).unwrap();
        assert_eq!(candidate.extension(), FileExtension::Csv);
        assert_eq!(candidate.size_bytes(), 3 * 1024 * 1024);

        let note = rx.try_recv().unwrap();
        assert_eq!(note.kind, NotificationKind::Info);
        assert_eq!(note.title, "File selected");
        assert_eq!(note.message, "people.csv (3.00 MB)");

        let candidate = selection.select("book.xlsx", &b"PK"[..]).unwrap();
        assert_eq!(candidate.mime_type(), FileExtension::Xlsx.mime_type());
        assert_eq!(selection.current().unwrap().name(), "book.xlsx");
    }

    #[test]
    fn rejection_keeps_previous_candidate() {
        let (mut selection, mut rx) = selection();
        selection.select("keep.csv", &b"a,b\n1,2\n"[..]).unwrap();
        let _ = rx.try_recv();

        for name in ["notes.txt", "data.CSV", "sheet.XLSX", "archive.csv.zip", "csv", "data.xls"] {
            let err = selection.select(name, &b"x"[..]).unwrap_err();
            assert!(err.is_validation(), "{} should be rejected", name);
            assert_eq!(selection.current().unwrap().name(), "keep.csv");

            let note = rx.try_recv().unwrap();
            assert_eq!(note.kind, NotificationKind::Destructive);
            assert_eq!(note.title, INVALID_FORMAT_TITLE);
            assert_eq!(note.message, UPLOAD_HINT);
        }
    }

    #[test]
    fn rejection_without_previous_candidate_leaves_none() {
        let (mut selection, _rx) = selection();
        assert!(selection.select("image.png", &b"x"[..]).is_err());
        assert!(selection.current().is_none());
    }

    #[test]
    fn clear_removes_candidate() {
        let (mut selection, _rx) = selection();
        selection.select("a.csv", &b"1"[..]).unwrap();
        selection.clear();
        assert!(selection.current().is_none());
        selection.clear();
        assert!(selection.current().is_none());
    }

    #[test]
    fn small_files_round_to_two_decimals() {
        let (mut selection, _rx) = selection();
        let candidate = selection.select("tiny.csv", vec![0u8; 1536]).unwrap();
        assert_eq!(candidate.size_megabytes(), "0.00");
        let candidate = selection.select("half.csv", vec![0u8; 512 * 1024]).unwrap();
        assert_eq!(candidate.size_megabytes(), "0.50");
    }

    #[tokio::test]
    async fn select_path_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        tokio::fs::write(&path, b"q,a\n1,yes\n").await.unwrap();

        let (mut selection, _rx) = selection();
        let candidate = selection.select_path(&path).await.unwrap();
        assert_eq!(candidate.name(), "survey.csv");
        assert_eq!(candidate.contents().as_ref(), b"q,a\n1,yes\n");
    }

    #[tokio::test]
    async fn select_path_missing_file_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let (mut selection, mut rx) = selection();
        selection.select("keep.csv", &b"1"[..]).unwrap();
        rx.try_recv().unwrap();

        let err = selection.select_path(&dir.path().join("gone.csv")).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(selection.current().unwrap().name(), "keep.csv");

        let note = rx.try_recv().unwrap();
        assert_eq!(note.kind, NotificationKind::Destructive);
        assert_eq!(note.title, READ_FAILED_TITLE);
        assert_eq!(note.message, err.message());
        assert!(note.message.contains("gone.csv"));
        assert!(rx.try_recv().is_err());
    }
}
