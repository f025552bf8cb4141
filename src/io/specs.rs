use crate::encoding::MaxSatInstance;
use anyhow::{Context, Result};
use std::io::Write;

/// A trait implemented by objects able to write MaxSAT instances, or structures derived from them.
pub trait InstanceWriter {
    /// Writes an instance.
    ///
    /// # Example
    ///
    /// ```
    /// # use distcover::encoding::DistanceCoverEncoder;
    /// # use distcover::io::{InstanceWriter, WcnfWriter};
    /// # use distcover::metric::Grid;
    /// let encoded = DistanceCoverEncoder::default().encode(&Grid::new(2, 2)).unwrap();
    /// let mut buffer = Vec::new();
    /// WcnfWriter::default().write_instance(&mut buffer, encoded.instance()).unwrap();
    /// assert!(String::from_utf8(buffer).unwrap().contains("p wcnf 10 "));
    /// ```
    fn write_instance(&self, writer: &mut dyn Write, instance: &MaxSatInstance) -> Result<()>;
}

/// A trait implemented by objects that write distance covers.
pub trait ResponseWriter {
    /// Writes the text associated with the fact the problem has no cover.
    fn write_no_cover(&self, writer: &mut dyn Write) -> Result<()>;

    /// Writes a cover, given by the labels of its points.
    fn write_cover(&self, writer: &mut dyn Write, labels: &[String]) -> Result<()>;

    /// Writes the distances a selection of points leaves uncovered.
    fn write_uncovered_distances(&self, writer: &mut dyn Write, distances: &[String]) -> Result<()>;
}

pub(crate) fn write_comments(writer: &mut dyn Write, comments: &[String]) -> Result<()> {
    comments
        .iter()
        .try_for_each(|c| writeln!(writer, "c {}", c).context("while writing comments"))
}
