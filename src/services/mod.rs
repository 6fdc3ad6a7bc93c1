pub mod executor;
pub mod exporter;
pub mod file_selection;
pub mod notifier;
pub mod progress;
pub mod sample_size;
pub mod session;

pub use executor::{PipelineExecutor, RunState};
pub use exporter::ReportExporter;
pub use file_selection::{FileSelection, UploadCandidate};
pub use notifier::{ChannelNotifier, Notification, NotificationKind, Notifier, TracingNotifier};
pub use progress::{ProgressSimulator, ProgressSnapshot, PIPELINE_STEPS};
pub use sample_size::{SampleSize, SampleSizeControl};
pub use session::PipelineSession;
