//! Sanjaya engine: stream transport, framing, dispatch and result archiving.
mod dispatch;
mod engine;
mod fetch;
mod filename;
mod frame;
mod persist;
mod session;
mod types;

pub use dispatch::{Dispatch, EventDispatcher, EventHandler, Flow};
pub use engine::{consume, QueryEngine, RunReport};
pub use fetch::{ByteSource, ReqwestSource, ReqwestStreamClient, StreamOpener, StreamSettings};
pub use filename::report_filename;
pub use frame::{FrameError, FrameParser, Frames, DATA_PREFIX, DEFAULT_MAX_LINE_BYTES};
pub use persist::{ensure_output_dir, PersistError, ReportArchive};
pub use session::{Navigator, Presenter, WorkflowSession};
pub use types::{StreamOutcome, StreamSummary, TransportError};
