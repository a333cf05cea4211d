use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crossrate_core::ExchangeRate;
use crossrate_ports::{ExchangeRateSink, SinkError};

/// Append-only file of exchange rates.
///
/// Each line is one JSON-serialized [`ExchangeRate`]. Every append is
/// flushed before returning.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Create or open the file at `path`; existing lines are kept.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::info!(path = %path.display(), "Opened exchange rate file");

        Ok(JsonLinesSink {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every stored rate.
    ///
    /// Corrupt lines are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<ExchangeRate>, SinkError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut rates = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ExchangeRate>(&line) {
                Ok(rate) => rates.push(rate),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Skipping corrupt exchange rate line"
                    );
                }
            }
        }

        Ok(rates)
    }
}

impl ExchangeRateSink for JsonLinesSink {
    fn append(&self, rate: &ExchangeRate) -> Result<(), SinkError> {
        let json =
            serde_json::to_string(rate).map_err(|e| SinkError::Serialization(e.to_string()))?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        Ok(())
    }
}
