use mutant_campaign::Dialect;
use mutant_campaign::syntax::{self, SyntaxNode};

const JS: &str = r#"// helpers
import { join } from "path";

export function total(items) {
  let sum = 0;
  for (const item of items) {
    sum += item.price * item.count;
  }
  return sum > 100 ? sum - 10 : sum;
}
"#;

const TS: &str = r#"interface Item { price: number; count: number }

export const total = (items: Item[]): number => {
  return items.reduce((acc, i) => acc + i.price * i.count, 0);
};
"#;

const TSX: &str = r#"export function Badge({ n }: { n: number }) {
  return <span className="badge">{n > 9 ? "9+" : n}</span>;
}
"#;

#[test]
fn print_reproduces_source_exactly() {
    for (source, dialect) in [
        (JS, Dialect::JavaScript),
        (TS, Dialect::TypeScript),
        (TSX, Dialect::Tsx),
    ] {
        let root = syntax::parse(source, dialect).unwrap();
        assert!(root.first_error().is_none(), "unexpected error in {:?}", dialect);
        assert_eq!(root.print(), source);
    }
}

#[test]
fn root_spans_whole_source() {
    let source = "\n\n  let x = 1;  \n";
    let root = syntax::parse(source, Dialect::JavaScript).unwrap();
    assert_eq!(root.start(), 0);
    assert_eq!(root.end(), source.len());
    assert_eq!(root.print(), source);
}

#[test]
fn lines_are_one_based() {
    let root = syntax::parse("let a = 1;\nlet b = 2;\n", Dialect::JavaScript).unwrap();
    let lines: Vec<usize> = {
        let mut lines = Vec::new();
        root.walk(|n| {
            if n.kind() == "number" {
                lines.push(n.line());
            }
        });
        lines
    };
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn walk_visits_children_before_parent() {
    let root = syntax::parse("f(a + b);", Dialect::JavaScript).unwrap();
    let mut kinds = Vec::new();
    root.walk(|n| {
        if n.is_named() {
            kinds.push(n.kind());
        }
    });
    let binary = kinds.iter().position(|k| *k == "binary_expression").unwrap();
    let call = kinds.iter().position(|k| *k == "call_expression").unwrap();
    assert!(binary < call);
    assert_eq!(kinds.last(), Some(&"program"));
}

#[test]
fn node_ref_exposes_ancestors() {
    let root = syntax::parse("if (x) { y = 1; }", Dialect::JavaScript).unwrap();
    let chain = root.find_map(|n| {
        if n.kind() == "number" {
            Some(n.ancestors().map(|a| a.kind()).collect::<Vec<_>>())
        } else {
            None
        }
    });
    let chain = chain.unwrap();
    assert_eq!(chain.first(), Some(&"assignment_expression"));
    assert!(chain.contains(&"statement_block"));
    assert_eq!(chain.last(), Some(&"program"));
}

#[test]
fn print_replacing_swaps_only_the_target() {
    let source = "let a = 1; let b = 1;";
    let root = syntax::parse(source, Dialect::JavaScript).unwrap();
    let mut numbers = Vec::new();
    root.walk(|n| {
        if n.kind() == "number" {
            numbers.push(n.node());
        }
    });
    assert_eq!(numbers.len(), 2);
    let replacement = SyntaxNode::synthetic("number", numbers[1], "42");
    assert_eq!(
        root.print_replacing(numbers[1], &replacement),
        "let a = 1; let b = 42;"
    );
}

#[test]
fn child_by_field_finds_named_parts() {
    let root = syntax::parse("a <= b;", Dialect::JavaScript).unwrap();
    let op = root.find_map(|n| {
        if n.kind() == "binary_expression" {
            n.child_by_field("operator").map(|op| op.text().to_string())
        } else {
            None
        }
    });
    assert_eq!(op.as_deref(), Some("<="));
}

#[test]
fn malformed_source_still_parses() {
    let root = syntax::parse("function (", Dialect::JavaScript).unwrap();
    assert!(root.first_error().is_some());
    assert_eq!(root.print(), "function (");
}
