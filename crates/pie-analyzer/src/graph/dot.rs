//! Graphviz DOT rendering

use std::fmt::Write;

use super::CallGraph;

/// Render `graph` as a DOT `digraph` labelled with `title`
pub fn to_dot(graph: &CallGraph, title: &str) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "digraph \"{}\" {{", escape(title));
    let _ = writeln!(out, "    label=\"{}\";", escape(title));
    let _ = writeln!(out, "    node [shape=box];");

    for vertex in graph.vertices() {
        let _ = writeln!(out, "    \"{}\" [label=\"{}\"];", escape(&vertex.name), escape(&vertex.to_string()));
    }
    for (from, to) in graph.edges() {
        let _ = writeln!(out, "    \"{}\" -> \"{}\";", escape(&from.name), escape(&to.name));
    }

    out.push_str("}\n");
    out
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ProcNode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dot_output() {
        let mut graph = CallGraph::new();
        graph.add_vertex(ProcNode::new("g"));
        graph.add_edge(ProcNode::new("f"), ProcNode::new("g"));
        graph.add_edge(ProcNode::new("f"), ProcNode::new("g"));

        let expected = "digraph \"calls\" {
    label=\"calls\";
    node [shape=box];
    \"g\" [label=\"g(..)\"];
    \"f\" [label=\"f(..)\"];
    \"f\" -> \"g\";
    \"f\" -> \"g\";
}
";
        assert_eq!(to_dot(&graph, "calls"), expected);
    }

    #[test]
    fn test_title_is_escaped() {
        let dot = to_dot(&CallGraph::new(), "say \"hi\"");
        assert!(dot.starts_with("digraph \"say \\\"hi\\\"\" {"));
    }
}
