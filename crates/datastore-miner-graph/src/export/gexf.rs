//! GEXF 1.2 writer.

use std::collections::HashMap;
use std::io::Write;

use chrono::Utc;

use crate::error::GraphResult;
use crate::graph::{Graph, VertexId};

const CREATOR: &str = "datastore-miner";

/// Escape text for use inside an XML attribute value.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Write `graph` as a static GEXF graph.
///
/// Nodes are numbered from 0, edges take their position in creation order
/// as id. Every attribute value is XML-escaped.
pub fn write_gexf<T, W: Write>(graph: &Graph<T>, mut writer: W) -> GraphResult<()> {
    let mut number: HashMap<VertexId, usize> = HashMap::with_capacity(graph.vertex_count());
    let edge_type = if graph.is_directed() {
        "directed"
    } else {
        "undirected"
    };

    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(writer, r#"<gexf xmlns="http://www.gexf.net/1.2draft" version="1.2">"#)?;
    writeln!(
        writer,
        r#"<meta lastmodifieddate="{}">"#,
        Utc::now().format("%Y-%m-%d")
    )?;
    writeln!(writer, "<creator>{}</creator>", CREATOR)?;
    writeln!(writer, "<description>Graph</description>")?;
    writeln!(writer, "</meta>")?;
    writeln!(writer, r#"<graph mode="static" defaultedgetype="{}">"#, edge_type)?;

    writeln!(writer, "<nodes>")?;
    for (i, v) in graph.vertices().enumerate() {
        number.insert(v.id(), i);
        writeln!(
            writer,
            r#"<node id="{}" label="{}" />"#,
            i,
            xml_escape(v.label_or_empty())
        )?;
    }
    writeln!(writer, "</nodes>")?;

    writeln!(writer, "<edges>")?;
    for (i, e) in graph.edges().enumerate() {
        if let (Some(source), Some(target)) = (number.get(&e.from()), number.get(&e.to())) {
            writeln!(
                writer,
                r#"<edge id="{}" source="{}" target="{}" weight="{}" label="{}" />"#,
                i,
                source,
                target,
                e.weight,
                xml_escape(&e.label)
            )?;
        }
    }
    writeln!(writer, "</edges>")?;
    writeln!(writer, "</graph>")?;
    writeln!(writer, "</gexf>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a & b"), "a &amp; b");
        assert_eq!(xml_escape("<\"x\">"), "&lt;&quot;x&quot;&gt;");
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn test_nodes_and_edges() {
        let mut g: Graph<()> = Graph::undirected();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        g.set_label(a, "Rates & Taxes").unwrap();
        g.set_label(b, "b").unwrap();
        g.connect_vertices(a, b, "0.75", 0.75).unwrap();

        let mut buf = Vec::new();
        write_gexf(&g, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(text.contains(r#"defaultedgetype="undirected""#));
        assert!(text.contains(r#"<node id="0" label="Rates &amp; Taxes" />"#));
        assert!(text.contains(r#"<node id="1" label="b" />"#));
        assert!(text.contains(
            r#"<edge id="0" source="0" target="1" weight="0.75" label="0.75" />"#
        ));
        assert!(text.trim_end().ends_with("</gexf>"));
    }

    #[test]
    fn test_directed_header() {
        let g: Graph<()> = Graph::directed();
        let mut buf = Vec::new();
        write_gexf(&g, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains(r#"defaultedgetype="directed""#));
        assert!(text.contains("<nodes>\n</nodes>"));
    }
}
