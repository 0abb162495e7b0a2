//! Recording and playback of temperature fields.
//!
//! A headless run can capture every tick to disk so an external viewer can
//! replay it without running the simulation.
//!
//! # File Format
//!
//! The `.thgr` format stores frames of `f64` temperatures with optional
//! compression:
//!
//! ```text
//! Header (40 bytes):
//!   Magic: "THGR" (4 bytes)
//!   Version: u16
//!   Flags: u16 (compression in low 4 bits)
//!   Rows: u32
//!   Cols: u32
//!   Frame count: u64
//!   Source rate: f64
//!   Reserved: 8 bytes
//!
//! Frame data (variable):
//!   Each frame is rows * cols * 8 bytes (f64, row-major)
//!   Optionally LZ4 compressed
//!
//! Frame index table (frame_count * 16 bytes, end of file):
//!   Offset: u64
//!   Stored size: u64
//! ```

mod format;
mod player;
mod recorder;

pub use format::{
    CompressionType, FrameIndex, RECORDING_MAGIC, RECORDING_VERSION, RecordingHeader,
};
pub use player::{FrameIterator, FramePlayer};
pub use recorder::{FrameRecorder, RecorderConfig, RecordingStats};
