//! Pajek `.net` writer.

use std::collections::HashMap;
use std::io::Write;

use crate::error::GraphResult;
use crate::graph::{Graph, VertexId};

/// Pajek quotes labels with `"` and has no escape for it.
fn pajek_label(label: &str) -> String {
    label.replace('"', "'")
}

/// Write `graph` as a Pajek network.
///
/// ```text
/// *Vertices 3
/// 1 "a"
/// 2 "b"
/// 3 "c"
/// *Arcs
/// *Edges
/// 1 2 0.5 l "ab"
/// ```
///
/// Directed edges go under `*Arcs`, undirected ones under `*Edges`.
pub fn write_pajek<T, W: Write>(graph: &Graph<T>, mut writer: W) -> GraphResult<()> {
    let mut number: HashMap<VertexId, usize> = HashMap::with_capacity(graph.vertex_count());

    writeln!(writer, "*Vertices {}", graph.vertex_count())?;
    for (i, v) in graph.vertices().enumerate() {
        number.insert(v.id(), i + 1);
        writeln!(writer, "{} \"{}\"", i + 1, pajek_label(v.label_or_empty()))?;
    }

    let write_edges = |writer: &mut W, directed: bool| -> GraphResult<()> {
        for e in graph.edges().filter(|e| e.is_directed() == directed) {
            if let (Some(from), Some(to)) = (number.get(&e.from()), number.get(&e.to())) {
                writeln!(
                    writer,
                    "{} {} {} l \"{}\"",
                    from,
                    to,
                    e.weight,
                    pajek_label(&e.label)
                )?;
            }
        }
        Ok(())
    };

    writeln!(writer, "*Arcs")?;
    write_edges(&mut writer, true)?;
    writeln!(writer, "*Edges")?;
    write_edges(&mut writer, false)?;
    Ok(())
}
