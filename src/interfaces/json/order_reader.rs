use crate::domain::order::OrderRequest;
use crate::error::{AppError, Result};
use std::io::{BufRead, BufReader, Read};

/// Reads orders from a JSON-lines source, one object per line.
///
/// Blank lines are skipped. A line that fails to decode yields an error and
/// reading continues with the next line.
pub struct OrderReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Lazily decodes orders without loading the whole source into memory.
    pub fn orders(self) -> impl Iterator<Item = Result<OrderRequest>> {
        self.reader.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(AppError::from)),
            Err(e) => Some(Err(AppError::from(e))),
        })
    }
}
