use super::{specs::write_comments, InstanceWriter};
use crate::{encoding::MaxSatInstance, sat::Literal};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for the classic weighted partial CNF format used in the MaxSAT evaluations.
///
/// The preamble is `p wcnf V C TOP`, where `TOP` is a weight greater than the sum of the soft weights.
/// Hard clauses are prefixed by `TOP`, soft clauses by their weight, and all clauses end with `0`.
/// Comment lines describing the variables come before the preamble.
#[derive(Default)]
pub struct WcnfWriter {
    comments: Vec<String>,
}

impl WcnfWriter {
    /// Adds comment lines to write before the description of the variables.
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments.extend(comments);
        self
    }
}

impl InstanceWriter for WcnfWriter {
    fn write_instance(&self, writer: &mut dyn Write, instance: &MaxSatInstance) -> Result<()> {
        let context = "while writing a WCNF instance";
        write_comments(writer, &self.comments)?;
        writeln!(
            writer,
            "c point variables: 1 to {}",
            instance.n_points()
        )
        .context(context)?;
        let vars = instance.variable_map();
        let n_mapped = vars.n_vars();
        writeln!(
            writer,
            "c pair variables: {} to {}",
            instance.n_points() + 1,
            n_mapped - vars.n_distances()
        )
        .context(context)?;
        if vars.n_distances() > 0 {
            writeln!(
                writer,
                "c distance variables: {} to {}",
                n_mapped - vars.n_distances() + 1,
                n_mapped
            )
            .context(context)?;
        }
        if instance.n_auxiliary_vars() > 0 {
            writeln!(
                writer,
                "c auxiliary variables: {} to {}",
                n_mapped + 1,
                instance.n_vars()
            )
            .context(context)?;
        }
        writeln!(
            writer,
            "c symmetry breaking clauses: {}",
            instance.n_symmetry_clauses()
        )
        .context(context)?;
        let top = instance.top_weight();
        writeln!(
            writer,
            "p wcnf {} {} {}",
            instance.n_vars(),
            instance.hard_clauses().len() + instance.soft_clauses().len(),
            top
        )
        .context(context)?;
        instance
            .hard_clauses()
            .iter()
            .try_for_each(|cl| write_clause(writer, top, cl))?;
        instance
            .soft_clauses()
            .iter()
            .try_for_each(|s| write_clause(writer, s.weight(), s.clause()))?;
        writer.flush().context(context)
    }
}

fn write_clause(writer: &mut dyn Write, weight: u64, clause: &[Literal]) -> Result<()> {
    let context = "while writing a clause";
    write!(writer, "{}", weight).context(context)?;
    clause
        .iter()
        .try_for_each(|l| write!(writer, " {}", l).context(context))?;
    writeln!(writer, " 0").context(context)
}
