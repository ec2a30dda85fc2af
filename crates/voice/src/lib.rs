//! Voice-query dispatch.
//!
//! Routes a recognized utterance to exactly one analytical query (or none),
//! resolving misheard product names by approximate matching. Speech capture
//! and report writing are collaborators behind the `Transcriber` and
//! `ReportExporter` traits.

pub mod clock;
pub mod dispatcher;
pub mod export;
pub mod intent;
pub mod resolver;
pub mod transcriber;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatcher::{CommandDispatcher, DispatchError, DispatchOutcome, ListenState};
pub use export::{ExportError, ReportExporter};
pub use intent::{IntentKind, IntentTable, IntentTableError};
pub use resolver::{Resolution, resolve_product, similarity};
pub use transcriber::{FixedTranscript, LineTranscriber, Transcriber, TranscriptionError};
