use super::ResponseWriter;
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for distance covers.
///
/// A cover is written as the letter `w` followed by the labels of its points, separated by spaces.
/// The distances a bounded selection leaves uncovered are written on a line starting with the letter `u`.
/// The absence of cover is written `NO`.
#[derive(Default)]
pub struct CoverWriter;

impl ResponseWriter for CoverWriter {
    fn write_no_cover(&self, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing problem has no cover";
        writeln!(writer, "NO").context(context)?;
        writer.flush().context(context)
    }

    fn write_cover(&self, writer: &mut dyn Write, labels: &[String]) -> Result<()> {
        let context = "while writing a cover";
        write!(writer, "w").context(context)?;
        labels
            .iter()
            .try_for_each(|l| write!(writer, " {}", l).context(context))?;
        writeln!(writer).context(context)?;
        writer.flush().context(context)
    }

    fn write_uncovered_distances(&self, writer: &mut dyn Write, distances: &[String]) -> Result<()> {
        let context = "while writing the uncovered distances";
        write!(writer, "u").context(context)?;
        distances
            .iter()
            .try_for_each(|d| write!(writer, " {}", d).context(context))?;
        writeln!(writer).context(context)?;
        writer.flush().context(context)
    }
}
