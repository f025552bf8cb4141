use super::{specs::write_comments, InstanceWriter};
use crate::{
    encoding::{Clause, MaxSatInstance},
    sat::Literal,
};
use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
};

/// A writer for the extended DIMACS graph whose automorphisms are the syntactic automorphisms of the hard clauses.
///
/// The variables occurring in the clauses are renumbered densely in increasing order.
/// The `i`-th of them (0-based) gives the vertices `2i+1` (positive literal) and `2i+2` (negative literal),
/// linked by an edge.
/// Binary clauses are edges between their literals.
/// Other clauses are vertices of color 1, linked to each of their literals.
/// Soft clauses are not written, since they are the same for each point and do not restrict the automorphisms.
#[derive(Default)]
pub struct ClauseGraphWriter {
    comments: Vec<String>,
}

impl ClauseGraphWriter {
    /// Adds comment lines to write before the graph.
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments.extend(comments);
        self
    }

    /// Writes the graph of a list of clauses.
    pub fn write_clauses(&self, writer: &mut dyn Write, clauses: &[Clause]) -> Result<()> {
        let context = "while writing a clause graph";
        write_comments(writer, &self.comments)?;
        let support = clauses
            .iter()
            .flatten()
            .map(|l| l.var())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(i, v)| (v, i))
            .collect::<BTreeMap<_, _>>();
        let literal_vertex = |l: &Literal| {
            let i = support[&l.var()];
            if l.is_positive() {
                2 * i + 1
            } else {
                2 * i + 2
            }
        };
        let (small, big): (Vec<&Clause>, Vec<&Clause>) = clauses.iter().partition(|cl| cl.len() == 2);
        let n_edges = support.len() + small.len() + big.iter().map(|cl| cl.len()).sum::<usize>();
        let base = 2 * support.len() + 1;
        writeln!(writer, "p edge {} {}", 2 * support.len() + big.len(), n_edges).context(context)?;
        (0..big.len()).try_for_each(|i| writeln!(writer, "n {} 1", base + i).context(context))?;
        (0..support.len())
            .try_for_each(|i| writeln!(writer, "e {} {}", 2 * i + 1, 2 * i + 2).context(context))?;
        small.iter().try_for_each(|cl| {
            writeln!(writer, "e {} {}", literal_vertex(&cl[0]), literal_vertex(&cl[1])).context(context)
        })?;
        big.iter().enumerate().try_for_each(|(i, cl)| {
            cl.iter()
                .try_for_each(|l| writeln!(writer, "e {} {}", base + i, literal_vertex(l)).context(context))
        })?;
        writer.flush().context(context)
    }
}

impl InstanceWriter for ClauseGraphWriter {
    fn write_instance(&self, writer: &mut dyn Write, instance: &MaxSatInstance) -> Result<()> {
        self.write_clauses(writer, instance.hard_clauses())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;
    use std::io::BufWriter;

    #[test]
    fn test_write_graph() {
        let clauses = vec![clause![-3, 1], clause![-3, 2], clause![3], clause![1, 2, -4]];
        let mut buffer = BufWriter::new(Vec::new());
        ClauseGraphWriter::default()
            .write_clauses(&mut buffer, &clauses)
            .unwrap();
        assert_eq!(
            r#"p edge 10 10
n 9 1
n 10 1
e 1 2
e 3 4
e 5 6
e 7 8
e 6 1
e 6 3
e 9 5
e 10 1
e 10 3
e 10 8
"#,
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }

    #[test]
    fn test_write_empty_graph() {
        let mut buffer = BufWriter::new(Vec::new());
        ClauseGraphWriter::default()
            .with_comments(vec!["empty".to_string()])
            .write_clauses(&mut buffer, &[])
            .unwrap();
        assert_eq!(
            "c empty\np edge 0 0\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }
}
