//! Call graph builder
//!
//! Walks every statement of every procedure and records one edge per call
//! site, including calls nested inside arguments and operands.

use log::debug;

use crate::frontend::ast::*;
use crate::frontend::CheckedScript;
use super::{CallGraph, ProcNode};

/// Build the call graph of a checked script
///
/// Vertices follow declaration order; edges follow traversal order within
/// each procedure (outer call before the calls in its arguments).
pub fn build_call_graph(checked: &CheckedScript) -> CallGraph {
    let script = checked.script();
    let mut graph = CallGraph::new();

    for procedure in &script.procedures {
        graph.add_vertex(ProcNode::new(procedure.name.as_str()));
    }

    for procedure in &script.procedures {
        let caller = ProcNode::new(procedure.name.as_str());
        let mut callees = Vec::new();
        for stmt in &procedure.body {
            collect_stmt_calls(stmt, &mut callees);
        }

        debug!("'{}' has {} call site(s)", procedure.name, callees.len());
        for callee in callees {
            graph.add_edge(caller.clone(), ProcNode::new(callee));
        }
    }

    graph
}

fn collect_stmt_calls<'a>(stmt: &'a Stmt, out: &mut Vec<&'a str>) {
    match &stmt.kind {
        StmtKind::VarDecl { init, .. } => {
            if let Some(init) = init {
                collect_expr_calls(init, out);
            }
        }
        StmtKind::Assign { value, .. } => collect_expr_calls(value, out),
        StmtKind::Call(call) => collect_call(call, out),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                collect_expr_calls(value, out);
            }
        }
    }
}

fn collect_expr_calls<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    match &expr.kind {
        ExprKind::Call(call) => collect_call(call, out),
        ExprKind::Binary { left, right, .. } => {
            collect_expr_calls(left, out);
            collect_expr_calls(right, out);
        }
        ExprKind::Unary { operand, .. } => collect_expr_calls(operand, out),
        ExprKind::IntLiteral(_) | ExprKind::BoolLiteral(_) | ExprKind::Identifier(_) => {}
    }
}

fn collect_call<'a>(call: &'a Call, out: &mut Vec<&'a str>) {
    out.push(&call.callee);
    for arg in &call.args {
        collect_expr_calls(arg, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TextInput;
    use crate::frontend::{check_script, Parser};
    use pretty_assertions::assert_eq;

    fn graph_of(source: &str) -> CallGraph {
        let script = Parser::new(source).parse().unwrap();
        let checked = check_script(script, &TextInput::new("<test>", source)).unwrap();
        build_call_graph(&checked)
    }

    fn node(name: &str) -> ProcNode {
        ProcNode::new(name)
    }

    #[test]
    fn test_simple_graph() {
        let graph = graph_of(
            "def g() : Void is
            end

            def f() : Void is
                g();
            end

            def m() : Int32 is
                f();
                g();
                return 0;
            end",
        );

        let vertices: Vec<_> = graph.vertices().cloned().collect();
        assert_eq!(vertices, vec![node("g"), node("f"), node("m")]);

        let mut edges: Vec<_> = graph.edge_set().into_iter().collect();
        edges.sort();
        assert_eq!(
            edges,
            vec![(node("f"), node("g")), (node("m"), node("f")), (node("m"), node("g"))]
        );

        assert_eq!(graph.out_degree(&node("m")), Ok(2));
        assert_eq!(graph.in_degree(&node("g")), 2);
        assert_eq!(graph.out_degree(&node("g")), Ok(0));
    }

    #[test]
    fn test_one_edge_per_call_site() {
        let graph = graph_of(
            "def inc(x : Int32) : Int32 is return x + 1; end
            def m() : Int32 is
                var a : Int32 := inc(inc(1));
                a := -inc(a) * 2;
                return inc(a);
            end",
        );

        assert_eq!(graph.out_degree(&node("m")), Ok(4));
        assert_eq!(graph.in_degree(&node("inc")), 4);
        assert_eq!(graph.edge_set().len(), 1);
    }

    #[test]
    fn test_nested_calls_in_traversal_order() {
        let graph = graph_of(
            "def a(x : Int32) : Int32 is return x; end
            def b() : Int32 is return 1; end
            def c(p : Bool) : Void is end
            def m() : Void is
                c(a(b()) > 0);
            end",
        );

        assert_eq!(
            graph.neighbors(&node("m")).unwrap(),
            &[node("c"), node("a"), node("b")]
        );
    }

    #[test]
    fn test_recursion_and_isolated_procedures() {
        let graph = graph_of(
            "def fact(n : Int32) : Int32 is return n * fact(n - 1); end
            def lonely() : Void is end",
        );

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edges(), vec![(node("fact"), node("fact"))]);
        assert!(graph.contains(&node("lonely")));
        assert_eq!(graph.in_degree(&node("lonely")), 0);
    }

    #[test]
    fn test_vertex_set_matches_declarations() {
        let source = "def z() : Void is end def y() : Void is z(); end def x() : Void is end";
        let script = Parser::new(source).parse().unwrap();
        let names: Vec<String> = script.procedure_names().map(String::from).collect();

        let checked = check_script(script, &TextInput::new("<test>", source)).unwrap();
        let graph = build_call_graph(&checked);
        let vertices: Vec<String> = graph.vertices().map(|v| v.name.clone()).collect();

        assert_eq!(vertices, names);
    }
}
