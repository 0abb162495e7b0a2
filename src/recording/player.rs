//! Frame player for reading back recorded temperature fields.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::format::{CompressionType, FrameIndex, RecordingHeader, decode_frame, decompress_lz4};

/// Player for recorded thermal grid files.
///
/// Usage:
/// ```ignore
/// let mut player = FramePlayer::open("run.thgr")?;
/// println!("Recording has {} frames", player.frame_count());
///
/// let field = player.read_frame(100)?;
///
/// for frame in player.frames() {
///     let field = frame?;
///     // Render field...
/// }
/// ```
pub struct FramePlayer {
    reader: BufReader<File>,
    header: RecordingHeader,
    frame_indices: Vec<FrameIndex>,
    /// Pre-allocated read buffer.
    read_buffer: Vec<u8>,
}

impl FramePlayer {
    /// Open a recording for playback.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let header = RecordingHeader::read_from(&mut reader)?;

        // Index table sits at the end of the file
        let file_len = reader.seek(SeekFrom::End(0))?;
        let index_start = header
            .frame_count
            .checked_mul(FrameIndex::SIZE as u64)
            .and_then(|index_size| file_len.checked_sub(index_size))
            .filter(|&start| start >= RecordingHeader::SIZE as u64)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("File too short for {} frame indices", header.frame_count),
                )
            })?;

        reader.seek(SeekFrom::Start(index_start))?;

        let mut frame_indices = Vec::with_capacity(header.frame_count as usize);
        for i in 0..header.frame_count {
            let index = FrameIndex::read_from(&mut reader)?;
            let in_bounds = index.offset >= RecordingHeader::SIZE as u64
                && index
                    .offset
                    .checked_add(index.size)
                    .is_some_and(|end| end <= index_start);
            if !in_bounds {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Frame {} lies outside the frame data region", i),
                ));
            }
            frame_indices.push(index);
        }

        let frame_size = header.frame_size();

        Ok(Self {
            reader,
            header,
            frame_indices,
            read_buffer: vec![0u8; frame_size],
        })
    }

    pub fn header(&self) -> &RecordingHeader {
        &self.header
    }

    /// Get total number of frames.
    pub fn frame_count(&self) -> u64 {
        self.header.frame_count
    }

    /// Grid dimensions as (rows, cols).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.header.rows as usize, self.header.cols as usize)
    }

    pub fn source_rate(&self) -> f64 {
        self.header.source_rate
    }

    /// Read a specific frame by index.
    pub fn read_frame(&mut self, frame_index: u64) -> io::Result<Vec<f64>> {
        let mut field = vec![0.0f64; self.header.cell_count()];
        self.read_frame_into(frame_index, &mut field)?;
        Ok(field)
    }

    /// Read frame data directly into a pre-allocated buffer.
    pub fn read_frame_into(&mut self, frame_index: u64, field: &mut [f64]) -> io::Result<()> {
        if frame_index >= self.header.frame_count {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Frame index {} out of range ({} frames)",
                    frame_index, self.header.frame_count
                ),
            ));
        }

        let index = self.frame_indices[frame_index as usize];
        let size = index.size as usize;
        self.reader.seek(SeekFrom::Start(index.offset))?;

        if self.read_buffer.len() < size {
            self.read_buffer.resize(size, 0);
        }
        self.reader.read_exact(&mut self.read_buffer[..size])?;

        match self.header.compression {
            CompressionType::None => decode_frame(&self.read_buffer[..size], field),
            CompressionType::Lz4 => {
                let raw = decompress_lz4(&self.read_buffer[..size])?;
                decode_frame(&raw, field)
            }
        }
    }

    /// Create an iterator over all frames.
    pub fn frames(&mut self) -> FrameIterator<'_> {
        FrameIterator {
            player: self,
            current: 0,
        }
    }
}

/// Iterator over recorded frames.
pub struct FrameIterator<'a> {
    player: &'a mut FramePlayer,
    current: u64,
}

impl Iterator for FrameIterator<'_> {
    type Item = io::Result<Vec<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.player.frame_count() {
            return None;
        }

        let result = self.player.read_frame(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.player.frame_count() - self.current) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameIterator<'_> {}
