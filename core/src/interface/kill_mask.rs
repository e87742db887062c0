use crate::prelude::{PrepError, PrepResult};
use ndarray::Array2;
use std::fs;
use std::path::Path;

/// Channels excluded from processing, indexed by frequency channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillMask {
    channels: Vec<bool>,
}

impl KillMask {
    /// Parse a mask listing: integer channel indices, whitespace or newline
    /// separated. An index outside the channel count is fatal for the
    /// candidate.
    pub fn parse(contents: &str, nchans: usize) -> PrepResult<Self> {
        let mut channels = vec![false; nchans];
        for token in contents.split_whitespace() {
            let index: usize = token.parse().map_err(|_| {
                PrepError::InvalidInput(format!("kill mask entry {token:?} is not an integer"))
            })?;
            if index >= nchans {
                return Err(PrepError::InvalidInput(format!(
                    "kill mask channel {index} outside 0..{nchans}",
                )));
            }
            channels[index] = true;
        }
        Ok(Self { channels })
    }

    /// Load a mask file; a nonexistent path is treated as "no mask".
    pub fn load(path: &Path, nchans: usize) -> PrepResult<Option<Self>> {
        if !path.is_file() {
            log::debug!("no kill mask at {}", path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(Self::parse(&contents, nchans)?))
    }

    pub fn is_killed(&self, chan: usize) -> bool {
        self.channels.get(chan).copied().unwrap_or(false)
    }

    pub fn killed_count(&self) -> usize {
        self.channels.iter().filter(|&&k| k).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.channels
    }

    /// Zero out the masked channels of a time x channel chunk.
    pub fn apply(&self, chunk: &mut Array2<f32>) {
        for (chan, &killed) in self.channels.iter().enumerate() {
            if killed {
                chunk.column_mut(chan).fill(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn listed_channels_become_true() {
        let mask = KillMask::parse("0 5\n10\n", 128).unwrap();
        assert_eq!(mask.as_slice().len(), 128);
        assert_eq!(mask.killed_count(), 3);
        for chan in [0, 5, 10] {
            assert!(mask.is_killed(chan));
        }
        assert!(!mask.is_killed(1));
    }

    #[test]
    fn out_of_range_channel_is_invalid() {
        let err = KillMask::parse("300", 128).unwrap_err();
        assert!(matches!(err, PrepError::InvalidInput(_)));
    }

    #[test]
    fn non_integer_entry_is_invalid() {
        let err = KillMask::parse("zap", 128).unwrap_err();
        assert!(matches!(err, PrepError::InvalidInput(_)));
    }

    #[test]
    fn missing_file_means_no_mask() {
        let dir = tempfile::tempdir().unwrap();
        let mask = KillMask::load(&dir.path().join("absent.txt"), 64).unwrap();
        assert!(mask.is_none());
    }

    #[test]
    fn load_parses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "3 7").unwrap();
        let mask = KillMask::load(&path, 16).unwrap().unwrap();
        assert!(mask.is_killed(3) && mask.is_killed(7));
    }

    #[test]
    fn apply_zeroes_masked_channels() {
        let mask = KillMask::parse("1", 3).unwrap();
        let mut chunk = Array2::from_elem((4, 3), 2.0);
        mask.apply(&mut chunk);
        assert!(chunk.column(1).iter().all(|&v| v == 0.0));
        assert!(chunk.column(0).iter().all(|&v| v == 2.0));
    }
}
