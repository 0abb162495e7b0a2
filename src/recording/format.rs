//! Binary format definitions for thermal grid recordings.

use std::io::{self, Read, Write};

/// Magic bytes identifying a thermal grid recording.
pub const RECORDING_MAGIC: &[u8; 4] = b"THGR";

/// Current format version.
pub const RECORDING_VERSION: u16 = 1;

/// Compression type for frame data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionType {
    /// No compression (raw f64 data).
    #[default]
    None = 0,
    /// LZ4 fast compression.
    Lz4 = 1,
}

impl CompressionType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Lz4),
            _ => None,
        }
    }
}

/// File header for thermal grid recordings.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingHeader {
    pub rows: u32,
    pub cols: u32,
    /// Total number of frames.
    pub frame_count: u64,
    /// Source rate of the recorded grid.
    pub source_rate: f64,
    /// Compression type (lower 4 bits of the flags word).
    pub compression: CompressionType,
}

impl RecordingHeader {
    /// Size of header in bytes.
    /// Magic(4) + Version(2) + Flags(2) + Rows(4) + Cols(4) +
    /// FrameCount(8) + SourceRate(8) + Reserved(8) = 40
    pub const SIZE: usize = 40;

    /// Number of cells per frame.
    ///
    /// Headers produced by [`read_from`](Self::read_from) are guaranteed to
    /// have an addressable frame size.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Compute size of one uncompressed frame in bytes.
    pub fn frame_size(&self) -> usize {
        self.cell_count() * 8
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(RECORDING_MAGIC)?;
        w.write_all(&RECORDING_VERSION.to_le_bytes())?;
        w.write_all(&(self.compression as u16).to_le_bytes())?;
        w.write_all(&self.rows.to_le_bytes())?;
        w.write_all(&self.cols.to_le_bytes())?;
        w.write_all(&self.frame_count.to_le_bytes())?;
        w.write_all(&self.source_rate.to_le_bytes())?;
        w.write_all(&[0u8; 8])?;
        Ok(())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != RECORDING_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Invalid THGR magic bytes",
            ));
        }

        let mut buf2 = [0u8; 2];
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != RECORDING_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported THGR version: {}", version),
            ));
        }

        r.read_exact(&mut buf2)?;
        let flags = u16::from_le_bytes(buf2);
        let compression = CompressionType::from_u8((flags & 0x0F) as u8).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown compression type: {}", flags & 0x0F),
            )
        })?;

        r.read_exact(&mut buf4)?;
        let rows = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf4)?;
        let cols = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf8)?;
        let frame_count = u64::from_le_bytes(buf8);

        r.read_exact(&mut buf8)?;
        let source_rate = f64::from_le_bytes(buf8);

        // Skip reserved bytes
        r.read_exact(&mut buf8)?;

        let frame_bytes = u64::from(rows)
            .checked_mul(u64::from(cols))
            .and_then(|cells| cells.checked_mul(8))
            .and_then(|bytes| usize::try_from(bytes).ok())
            .filter(|&bytes| bytes <= isize::MAX as usize);
        if frame_bytes.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Frame of {}x{} cells is too large", rows, cols),
            ));
        }

        Ok(Self {
            rows,
            cols,
            frame_count,
            source_rate,
            compression,
        })
    }
}

/// Index entry for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameIndex {
    /// Byte offset from start of file.
    pub offset: u64,
    /// Stored size in bytes (equals uncompressed if no compression).
    pub size: u64,
}

impl FrameIndex {
    /// Size of one index entry in bytes.
    pub const SIZE: usize = 16;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.offset.to_le_bytes())?;
        w.write_all(&self.size.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf8)?;
        let offset = u64::from_le_bytes(buf8);

        r.read_exact(&mut buf8)?;
        let size = u64::from_le_bytes(buf8);

        Ok(Self { offset, size })
    }
}

/// Encode f64 slice into `out` (must be `data.len() * 8` bytes).
pub fn encode_frame_into(data: &[f64], out: &mut [u8]) {
    for (chunk, &v) in out.chunks_exact_mut(8).zip(data.iter()) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}

/// Decode bytes to f64 slice.
pub fn decode_frame(bytes: &[u8], output: &mut [f64]) -> io::Result<()> {
    if bytes.len() != output.len() * 8 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Frame size mismatch: {} bytes vs {} cells",
                bytes.len(),
                output.len()
            ),
        ));
    }
    for (v, chunk) in output.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut buf8 = [0u8; 8];
        buf8.copy_from_slice(chunk);
        *v = f64::from_le_bytes(buf8);
    }
    Ok(())
}

/// Compress data using LZ4.
#[cfg(feature = "lz4")]
pub fn compress_lz4(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress LZ4 data.
#[cfg(feature = "lz4")]
pub fn decompress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    lz4_flex::decompress_size_prepended(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Fallback when LZ4 is not available.
#[cfg(not(feature = "lz4"))]
pub fn compress_lz4(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

#[cfg(not(feature = "lz4"))]
pub fn decompress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    Ok(data.to_vec())
}
