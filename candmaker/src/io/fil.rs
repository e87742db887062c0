use candcore::candidate::ChunkGeometry;
use candcore::prelude::{PrepError, PrepResult};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Minimal sigproc filterbank reader.
///
/// Parses the length-prefixed keyword header and exposes block reads over
/// the time-major sample stream. Supports 8-, 16- and 32-bit samples; for
/// multi-IF files only the first IF is read.
pub struct SigprocFile {
    path: PathBuf,
    pub nchans: usize,
    pub nbits: u32,
    pub nifs: usize,
    pub tsamp: f64,
    /// Observation start, MJD.
    pub tstart: f64,
    pub fch1: f64,
    pub foff: f64,
    pub nsamples: usize,
    data_start: u64,
}

fn read_u32(reader: &mut impl Read) -> PrepResult<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_i32(reader: &mut impl Read) -> PrepResult<i32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

fn read_f64(reader: &mut impl Read) -> PrepResult<f64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(f64::from_le_bytes(bytes))
}

fn read_keyword(reader: &mut impl Read) -> PrepResult<String> {
    let len = read_u32(reader)? as usize;
    if len == 0 || len > 80 {
        return Err(PrepError::InvalidInput(format!(
            "implausible header string length {len}"
        )));
    }
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes)
        .map_err(|_| PrepError::InvalidInput("non-utf8 header keyword".into()))
}

impl SigprocFile {
    pub fn open(path: &Path) -> PrepResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        if read_keyword(&mut reader)? != "HEADER_START" {
            return Err(PrepError::InvalidInput(format!(
                "{} is not a sigproc filterbank",
                path.display()
            )));
        }

        let mut nchans = 0usize;
        let mut nbits = 0u32;
        let mut nifs = 1usize;
        let mut tsamp = 0.0f64;
        let mut tstart = 0.0f64;
        let mut fch1 = 0.0f64;
        let mut foff = 0.0f64;

        loop {
            let keyword = read_keyword(&mut reader)?;
            match keyword.as_str() {
                "HEADER_END" => break,
                "nchans" => nchans = read_i32(&mut reader)? as usize,
                "nbits" => nbits = read_i32(&mut reader)? as u32,
                "nifs" => nifs = read_i32(&mut reader)? as usize,
                "machine_id" | "telescope_id" | "data_type" | "barycentric"
                | "pulsarcentric" | "nbeams" | "ibeam" => {
                    read_i32(&mut reader)?;
                }
                "tsamp" => tsamp = read_f64(&mut reader)?,
                "tstart" => tstart = read_f64(&mut reader)?,
                "fch1" => fch1 = read_f64(&mut reader)?,
                "foff" => foff = read_f64(&mut reader)?,
                "az_start" | "za_start" | "src_raj" | "src_dej" | "refdm" | "period" => {
                    read_f64(&mut reader)?;
                }
                "source_name" | "rawdatafile" => {
                    read_keyword(&mut reader)?;
                }
                other => {
                    return Err(PrepError::InvalidInput(format!(
                        "unknown filterbank header keyword {other:?}"
                    )));
                }
            }
        }

        if nchans == 0 || tsamp <= 0.0 {
            return Err(PrepError::InvalidInput(format!(
                "{} is missing nchans or tsamp",
                path.display()
            )));
        }
        if !matches!(nbits, 8 | 16 | 32) {
            return Err(PrepError::UnsupportedFormat(format!(
                "{}-bit filterbank samples",
                nbits
            )));
        }

        let data_start = reader.stream_position()?;
        let file_len = reader.get_ref().metadata()?.len();
        let frame_bytes = (nchans * nifs * (nbits as usize / 8)) as u64;
        let nsamples = ((file_len - data_start) / frame_bytes) as usize;

        Ok(Self {
            path: path.to_path_buf(),
            nchans,
            nbits,
            nifs,
            tsamp,
            tstart,
            fch1,
            foff,
            nsamples,
            data_start,
        })
    }

    pub fn geometry(&self) -> ChunkGeometry {
        ChunkGeometry {
            nchans: self.nchans,
            tsamp: self.tsamp,
            fch1: self.fch1,
            foff: self.foff,
        }
    }

    /// Read `count` samples starting at `start`, as a time x channel block.
    pub fn read_block(&self, start: usize, count: usize) -> PrepResult<Array2<f32>> {
        if start + count > self.nsamples {
            return Err(PrepError::ShapeMismatch(format!(
                "block {}..{} outside the {} samples of {}",
                start,
                start + count,
                self.nsamples,
                self.path.display()
            )));
        }

        let bytes_per = self.nbits as usize / 8;
        let frame = self.nchans * self.nifs * bytes_per;
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.data_start + (start * frame) as u64))?;
        let mut buf = vec![0u8; count * frame];
        file.read_exact(&mut buf)?;

        let mut block = Array2::zeros((count, self.nchans));
        for t in 0..count {
            let row = &buf[t * frame..t * frame + self.nchans * bytes_per];
            for c in 0..self.nchans {
                block[[t, c]] = match self.nbits {
                    8 => row[c] as f32,
                    16 => u16::from_le_bytes([row[2 * c], row[2 * c + 1]]) as f32,
                    _ => f32::from_le_bytes([
                        row[4 * c],
                        row[4 * c + 1],
                        row[4 * c + 2],
                        row[4 * c + 3],
                    ]),
                };
            }
        }
        Ok(block)
    }
}
