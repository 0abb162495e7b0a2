//! Frame recorder for capturing temperature fields.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use super::format::{
    CompressionType, FrameIndex, RecordingHeader, compress_lz4, encode_frame_into,
};
use crate::compute::DiffusionGrid;

/// Configuration for frame recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Compression type to use.
    pub compression: CompressionType,
    /// Record every Nth frame (1 = every frame).
    pub frame_skip: u32,
    /// Maximum frames to record (0 = unlimited).
    pub max_frames: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::None,
            frame_skip: 1,
            max_frames: 0,
        }
    }
}

/// Recorder that captures temperature frames to a file.
///
/// Usage:
/// ```ignore
/// let mut recorder = FrameRecorder::new("run.thgr", &grid, Default::default())?;
/// for _ in 0..1000 {
///     grid.tick();
///     recorder.record_frame(&grid)?;
/// }
/// recorder.finalize()?;
/// ```
pub struct FrameRecorder {
    writer: BufWriter<File>,
    header: RecordingHeader,
    frame_indices: Vec<FrameIndex>,
    config: RecorderConfig,
    frames_written: u64,
    step_counter: u32,
    /// Pre-allocated buffer for frame encoding.
    encode_buffer: Vec<u8>,
}

impl FrameRecorder {
    /// Create a new recorder for grids shaped like `grid`.
    pub fn new<P: AsRef<Path>>(
        path: P,
        grid: &DiffusionGrid,
        config: RecorderConfig,
    ) -> io::Result<Self> {
        let (rows, cols) = grid.dimensions();
        let (Ok(rows), Ok(cols)) = (u32::try_from(rows), u32::try_from(cols)) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}x{} grid exceeds recording dimension limits", rows, cols),
            ));
        };

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = RecordingHeader {
            rows,
            cols,
            frame_count: 0, // Will be updated on finalize
            source_rate: grid.source_rate(),
            compression: config.compression,
        };

        // Placeholder header, rewritten on finalize
        header.write_to(&mut writer)?;

        let frame_size = header.frame_size();

        Ok(Self {
            writer,
            header,
            frame_indices: Vec::new(),
            config,
            frames_written: 0,
            step_counter: 0,
            encode_buffer: vec![0u8; frame_size],
        })
    }

    /// Record the grid's current temperature field.
    ///
    /// Returns true if frame was actually recorded (may skip frames based on config).
    pub fn record_frame(&mut self, grid: &DiffusionGrid) -> io::Result<bool> {
        let temperatures = grid.temperatures();
        if temperatures.len() != self.header.cell_count() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Grid has {} cells, recording expects {}x{}",
                    temperatures.len(),
                    self.header.rows,
                    self.header.cols
                ),
            ));
        }

        self.step_counter += 1;

        // Check frame skip
        if self.step_counter < self.config.frame_skip {
            return Ok(false);
        }
        self.step_counter = 0;

        // Check max frames
        if self.config.max_frames > 0 && self.frames_written >= self.config.max_frames {
            return Ok(false);
        }

        let offset = self.writer.stream_position()?;
        encode_frame_into(temperatures, &mut self.encode_buffer);

        let size = match self.header.compression {
            CompressionType::None => {
                self.writer.write_all(&self.encode_buffer)?;
                self.encode_buffer.len()
            }
            CompressionType::Lz4 => {
                let compressed = compress_lz4(&self.encode_buffer);
                self.writer.write_all(&compressed)?;
                compressed.len()
            }
        };

        self.frame_indices.push(FrameIndex {
            offset,
            size: size as u64,
        });
        self.frames_written += 1;

        Ok(true)
    }

    /// Finalize the recording.
    ///
    /// Writes frame index table and updates header with final frame count.
    pub fn finalize(mut self) -> io::Result<RecordingStats> {
        let index_offset = self.writer.stream_position()?;
        for index in &self.frame_indices {
            index.write_to(&mut self.writer)?;
        }

        self.header.frame_count = self.frames_written;

        self.writer.seek(SeekFrom::Start(0))?;
        self.header.write_to(&mut self.writer)?;
        self.writer.flush()?;

        let total_bytes =
            index_offset + (self.frame_indices.len() as u64 * FrameIndex::SIZE as u64);

        let stats = RecordingStats {
            frame_count: self.frames_written,
            total_bytes,
            average_frame_size: if self.frames_written > 0 {
                index_offset.saturating_sub(RecordingHeader::SIZE as u64) / self.frames_written
            } else {
                0
            },
            compression: self.header.compression,
        };
        debug!("Finalized recording: {}", stats);

        Ok(stats)
    }

    /// Get number of frames recorded so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

/// Statistics from recording session.
#[derive(Debug, Clone)]
pub struct RecordingStats {
    /// Total frames recorded.
    pub frame_count: u64,
    /// Total file size in bytes.
    pub total_bytes: u64,
    /// Average stored frame size.
    pub average_frame_size: u64,
    /// Compression used.
    pub compression: CompressionType,
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, {} bytes total, {} bytes/frame avg ({:?} compression)",
            self.frame_count, self.total_bytes, self.average_frame_size, self.compression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GridConfig;
    use std::fs;
    use tempfile::tempdir;

    fn test_grid() -> DiffusionGrid {
        let mut config = GridConfig::uniform(8, 6, 1.0, 1.0);
        config.initial_sources.push(crate::compute::Cell::new(2, 3));
        DiffusionGrid::new(&config).unwrap()
    }

    #[test]
    fn test_recorder_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.thgr");

        let mut grid = test_grid();
        let mut recorder = FrameRecorder::new(&path, &grid, RecorderConfig::default()).unwrap();

        for _ in 0..10 {
            grid.tick();
            assert!(recorder.record_frame(&grid).unwrap());
        }

        let stats = recorder.finalize().unwrap();
        assert_eq!(stats.frame_count, 10);
        assert_eq!(stats.average_frame_size, 8 * 6 * 8);

        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), stats.total_bytes);
    }

    #[test]
    fn test_recorder_frame_skip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skip.thgr");

        let grid = test_grid();
        let rec_config = RecorderConfig {
            frame_skip: 5,
            ..Default::default()
        };
        let mut recorder = FrameRecorder::new(&path, &grid, rec_config).unwrap();

        // 20 calls, frames at calls 5, 10, 15, 20
        for _ in 0..20 {
            recorder.record_frame(&grid).unwrap();
        }

        let stats = recorder.finalize().unwrap();
        assert_eq!(stats.frame_count, 4);
    }

    #[test]
    fn test_recorder_max_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("max.thgr");

        let grid = test_grid();
        let rec_config = RecorderConfig {
            max_frames: 5,
            ..Default::default()
        };
        let mut recorder = FrameRecorder::new(&path, &grid, rec_config).unwrap();

        for _ in 0..100 {
            recorder.record_frame(&grid).unwrap();
        }

        assert_eq!(recorder.frames_written(), 5);
        let stats = recorder.finalize().unwrap();
        assert_eq!(stats.frame_count, 5);
    }

    #[test]
    fn test_recorder_rejects_other_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shape.thgr");

        let grid = test_grid();
        let other = DiffusionGrid::new(&GridConfig::uniform(3, 3, 0.0, 1.0)).unwrap();
        let mut recorder = FrameRecorder::new(&path, &grid, RecorderConfig::default()).unwrap();

        let err = recorder.record_frame(&other).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(recorder.frames_written(), 0);
    }
}
