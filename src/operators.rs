//! Mutation operator catalog for JavaScript and TypeScript syntax trees.
//!
//! Each operator is a guard/transform pair of plain functions over tree-sitter
//! node kinds. An operator's position in the catalog is the `mutatorIndex`
//! stored in plan files, so new operators go at the end.

use std::fmt;

use crate::syntax::{NodeRef, SyntaxNode};

pub type Guard = fn(NodeRef<'_, '_>) -> bool;
pub type Transform = fn(NodeRef<'_, '_>) -> Option<SyntaxNode>;

#[derive(Clone, Copy)]
pub struct MutationOperator {
    pub name: &'static str,
    guard: Guard,
    transform: Transform,
}

impl MutationOperator {
    pub const fn new(name: &'static str, guard: Guard, transform: Transform) -> Self {
        MutationOperator { name, guard, transform }
    }

    /// Anonymous tokens and nodes inside ERROR/MISSING subtrees never match.
    pub fn matches(&self, node: NodeRef<'_, '_>) -> bool {
        node.is_named() && !node.is_malformed() && (self.guard)(node)
    }

    /// Replacement node for `node`, or `None` when the guard does not hold
    /// or the node lacks the parts the rewrite needs.
    pub fn apply(&self, node: NodeRef<'_, '_>) -> Option<SyntaxNode> {
        if !self.matches(node) {
            return None;
        }
        (self.transform)(node)
    }
}

impl fmt::Debug for MutationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationOperator").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    operators: Vec<MutationOperator>,
}

impl Catalog {
    pub fn new(operators: Vec<MutationOperator>) -> Self {
        Catalog { operators }
    }

    pub fn standard() -> Self {
        Catalog::new(vec![
            MutationOperator::new("ArrayLiteral", is_array_literal, array_literal),
            MutationOperator::new("ArrayNewExpression", is_array_constructor, array_constructor),
            MutationOperator::new("ArrowFunction", is_block_arrow, stub_arrow),
            MutationOperator::new("BinaryExpression", is_invertible_binary, invert_binary),
            MutationOperator::new("Block", is_non_empty_block, empty_block),
            MutationOperator::new("BooleanSubstitution", is_boolean, flip_boolean),
            MutationOperator::new("ConditionalExpression", is_negatable_condition, negate_condition),
            MutationOperator::new("DoStatement", is_do_statement, force_condition_false),
            MutationOperator::new("ForStatement", is_for_statement, force_loop_test_false),
            MutationOperator::new("IfStatement", is_if_statement, force_condition_false),
            MutationOperator::new("NumericLiteral", is_numeric_literal, flip_numeric),
            MutationOperator::new("ObjectLiteral", is_non_empty_object, empty_object),
            MutationOperator::new("PostfixUnaryExpression", is_postfix_update, swap_unary_operator),
            MutationOperator::new("PrefixUnaryExpression", is_prefix_unary, swap_unary_operator),
            MutationOperator::new("StringLiteral", is_mutable_string, flip_string),
            MutationOperator::new("SwitchCase", is_non_empty_case, empty_case),
            MutationOperator::new("WhileStatement", is_while_statement, force_condition_false),
        ])
    }

    pub fn get(&self, index: usize) -> Option<&MutationOperator> {
        self.operators.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.operators.iter().position(|op| op.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &MutationOperator)> {
        self.operators.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}

/// Binary operator swap table. `%` maps to `*` one way only.
pub fn invert_binary_operator(op: &str) -> Option<&'static str> {
    match op {
        "+" => Some("-"),
        "-" => Some("+"),
        "/" => Some("*"),
        "*" => Some("/"),
        "%" => Some("*"),
        "<" => Some("<="),
        "<=" => Some("<"),
        ">" => Some(">="),
        ">=" => Some(">"),
        "==" => Some("!="),
        "!=" => Some("=="),
        "===" => Some("!=="),
        "!==" => Some("==="),
        "||" => Some("&&"),
        "&&" => Some("||"),
        _ => None,
    }
}

pub fn swap_unary_operator_text(op: &str) -> Option<&'static str> {
    match op {
        "++" => Some("--"),
        "--" => Some("++"),
        "+" => Some("-"),
        "-" => Some("+"),
        _ => None,
    }
}

/// Whether a numeric literal's value is zero. Handles separators, radix
/// prefixes and the BigInt suffix.
pub fn is_zero_literal(text: &str) -> bool {
    let digits: String = text
        .strip_suffix('n')
        .unwrap_or(text)
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();

    for prefix in ["0x", "0b", "0o"] {
        if let Some(rest) = digits.strip_prefix(prefix) {
            return !rest.is_empty() && rest.chars().all(|c| c == '0');
        }
    }
    digits.parse::<f64>().is_ok_and(|v| v == 0.0)
}

const CONDITION_OPERATORS: &[&str] = &[
    "<", "<=", ">", ">=", "==", "!=", "===", "!==", "&&", "||", "??", "instanceof", "in",
];

const STATEMENT_CONDITION_HOSTS: &[&str] = &[
    "if_statement",
    "for_statement",
    "while_statement",
    "do_statement",
    "literal_type",
];

const STRING_PROTECTED_PARENTS: &[&str] = &[
    "import_statement",
    "export_statement",
    "module",
    "internal_module",
    "import_require_clause",
    "jsx_attribute",
    "expression_statement",
    "literal_type",
];

fn content_children(node: &SyntaxNode) -> impl Iterator<Item = &SyntaxNode> {
    node.named_children().filter(|c| c.kind() != "comment")
}

/// Character directly before `offset`, read from the nearest node that
/// spans it. The enclosing expression may own it (`a-` in `a-+x`).
fn char_before(node: NodeRef<'_, '_>, offset: usize) -> Option<char> {
    std::iter::once(node.node())
        .chain(node.ancestors())
        .find(|n| n.start() < offset && offset <= n.end())
        .and_then(|n| n.text()[..offset - n.start()].chars().next_back())
}

/// Operator token text, padded on either side where a sign would fuse with
/// its neighbour (`a+-b` must not become `a--b`, nor `a-+x` become `a--x`).
fn operator_token(
    swapped: &'static str,
    op: &SyntaxNode,
    prev: Option<char>,
    next: Option<&SyntaxNode>,
) -> String {
    let is_sign = |c: char| matches!(c, '+' | '-');
    let fuses_before = prev.is_some_and(|p| is_sign(p) && swapped.starts_with(p));
    let fuses_after = next.is_some_and(|n| {
        n.start() == op.end()
            && swapped
                .chars()
                .last()
                .is_some_and(|c| is_sign(c) && n.text().starts_with(c))
    });

    let mut token = String::with_capacity(swapped.len() + 2);
    if fuses_before {
        token.push(' ');
    }
    token.push_str(swapped);
    if fuses_after {
        token.push(' ');
    }
    token
}

fn is_array_literal(node: NodeRef) -> bool {
    node.kind() == "array"
}

fn array_literal(node: NodeRef) -> Option<SyntaxNode> {
    let text = if content_children(&node).next().is_some() {
        "[]"
    } else {
        "[\"foo\"]"
    };
    Some(SyntaxNode::synthetic("array", &node, text))
}

fn is_array_constructor(node: NodeRef) -> bool {
    node.kind() == "new_expression"
        && node
            .child_by_field("constructor")
            .is_some_and(|c| c.text().trim() == "Array")
}

fn array_constructor(node: NodeRef) -> Option<SyntaxNode> {
    let has_args = node
        .child_by_field("arguments")
        .is_some_and(|args| content_children(args).next().is_some());
    let text = if has_args {
        "new Array([])"
    } else {
        "new Array([\"foo\"])"
    };
    Some(SyntaxNode::synthetic("new_expression", &node, text))
}

fn is_block_arrow(node: NodeRef) -> bool {
    node.kind() == "arrow_function"
        && node
            .child_by_field("body")
            .is_some_and(|b| b.kind() == "statement_block")
}

fn stub_arrow(node: NodeRef) -> Option<SyntaxNode> {
    Some(SyntaxNode::synthetic("arrow_function", &node, "() => undefined"))
}

fn is_invertible_binary(node: NodeRef) -> bool {
    node.kind() == "binary_expression"
        && node
            .child_by_field("operator")
            .is_some_and(|op| invert_binary_operator(op.text()).is_some())
}

fn invert_binary(node: NodeRef) -> Option<SyntaxNode> {
    let op = node.child_by_field("operator")?;
    let swapped = invert_binary_operator(op.text())?;
    let prev = char_before(node, op.start());
    let text = operator_token(swapped, op, prev, node.child_by_field("right"));
    Some(node.with_child_replaced(op, SyntaxNode::synthetic(swapped, op, text)))
}

fn is_non_empty_block(node: NodeRef) -> bool {
    node.kind() == "statement_block" && content_children(&node).next().is_some()
}

fn empty_block(node: NodeRef) -> Option<SyntaxNode> {
    Some(SyntaxNode::synthetic("statement_block", &node, "{}"))
}

fn is_boolean(node: NodeRef) -> bool {
    matches!(node.kind(), "true" | "false")
}

fn flip_boolean(node: NodeRef) -> Option<SyntaxNode> {
    let flipped = if node.kind() == "true" { "false" } else { "true" };
    Some(SyntaxNode::synthetic(flipped, &node, flipped))
}

fn is_negatable_condition(node: NodeRef) -> bool {
    node.kind() == "binary_expression"
        && node
            .child_by_field("operator")
            .is_some_and(|op| CONDITION_OPERATORS.contains(&op.text()))
        && !is_statement_condition(node)
}

/// The expression is the test of an if/for/while/do, possibly wrapped in
/// parentheses, or sits directly in a literal type.
fn is_statement_condition(node: NodeRef) -> bool {
    let mut above = node
        .ancestors()
        .skip_while(|a| a.kind() == "parenthesized_expression");
    match above.next() {
        Some(host) if STATEMENT_CONDITION_HOSTS.contains(&host.kind()) => true,
        // older grammars wrap the for-loop test in an expression_statement
        Some(host) if host.kind() == "expression_statement" => {
            above.next().is_some_and(|p| p.kind() == "for_statement")
        }
        _ => false,
    }
}

fn negate_condition(node: NodeRef) -> Option<SyntaxNode> {
    let text = format!("!({})", node.text());
    Some(SyntaxNode::synthetic("unary_expression", &node, text))
}

fn is_do_statement(node: NodeRef) -> bool {
    node.kind() == "do_statement"
}

fn is_if_statement(node: NodeRef) -> bool {
    node.kind() == "if_statement"
}

fn is_while_statement(node: NodeRef) -> bool {
    node.kind() == "while_statement"
}

fn force_condition_false(node: NodeRef) -> Option<SyntaxNode> {
    let condition = node.child_by_field("condition")?;
    let forced = SyntaxNode::synthetic("parenthesized_expression", condition, "(false)");
    Some(node.with_child_replaced(condition, forced))
}

fn is_for_statement(node: NodeRef) -> bool {
    node.kind() == "for_statement"
}

fn force_loop_test_false(node: NodeRef) -> Option<SyntaxNode> {
    let test = node.child_by_field("condition")?;
    // The test either carries its own `;` or is the bare expression.
    let text = match test.kind() {
        "expression_statement" | "empty_statement" | ";" => "false;",
        _ => "false",
    };
    Some(node.with_child_replaced(test, SyntaxNode::synthetic("false", test, text)))
}

fn is_numeric_literal(node: NodeRef) -> bool {
    node.kind() == "number"
}

fn flip_numeric(node: NodeRef) -> Option<SyntaxNode> {
    let suffix = if node.text().ends_with('n') { "n" } else { "" };
    let value = if is_zero_literal(node.text()) { "5" } else { "0" };
    Some(SyntaxNode::synthetic("number", &node, format!("{}{}", value, suffix)))
}

fn is_non_empty_object(node: NodeRef) -> bool {
    node.kind() == "object" && content_children(&node).next().is_some()
}

fn empty_object(node: NodeRef) -> Option<SyntaxNode> {
    Some(SyntaxNode::synthetic("object", &node, "{}"))
}

/// Operator of an update expression and whether it comes first (`++i`).
fn update_operator<'t>(node: &'t SyntaxNode) -> Option<(&'t SyntaxNode, bool)> {
    if node.kind() != "update_expression" {
        return None;
    }
    let op = node.child_by_field("operator")?;
    let argument = node.child_by_field("argument")?;
    Some((op, op.start() < argument.start()))
}

fn is_postfix_update(node: NodeRef) -> bool {
    matches!(update_operator(&node), Some((_, false)))
}

fn is_prefix_unary(node: NodeRef) -> bool {
    match node.kind() {
        "update_expression" => matches!(update_operator(&node), Some((_, true))),
        "unary_expression" => node
            .child_by_field("operator")
            .is_some_and(|op| matches!(op.text(), "+" | "-")),
        _ => false,
    }
}

fn swap_unary_operator(node: NodeRef) -> Option<SyntaxNode> {
    let op = node.child_by_field("operator")?;
    let swapped = swap_unary_operator_text(op.text())?;
    let prev = char_before(node, op.start());
    let text = operator_token(swapped, op, prev, node.child_by_field("argument"));
    Some(node.with_child_replaced(op, SyntaxNode::synthetic(swapped, op, text)))
}

fn is_mutable_string(node: NodeRef) -> bool {
    matches!(node.kind(), "string" | "template_string")
        && node
            .parent()
            .is_some_and(|p| !STRING_PROTECTED_PARENTS.contains(&p.kind()))
}

fn flip_string(node: NodeRef) -> Option<SyntaxNode> {
    let empty = matches!(node.text(), "\"\"" | "''" | "``");
    let text = if empty { "\"foo\"" } else { "\"\"" };
    Some(SyntaxNode::synthetic("string", &node, text))
}

/// The `:` ending a case/default header and the statements after it.
fn case_parts(node: &SyntaxNode) -> Option<(&SyntaxNode, usize)> {
    if !matches!(node.kind(), "switch_case" | "switch_default") {
        return None;
    }
    let colon_at = node
        .children()
        .iter()
        .position(|c| !c.is_named() && c.kind() == ":")?;
    let statements = node.children()[colon_at + 1..]
        .iter()
        .filter(|c| c.is_named() && c.kind() != "comment")
        .count();
    Some((&node.children()[colon_at], statements))
}

fn is_non_empty_case(node: NodeRef) -> bool {
    case_parts(&node).is_some_and(|(_, statements)| statements > 0)
}

fn empty_case(node: NodeRef) -> Option<SyntaxNode> {
    let (colon, _) = case_parts(&node)?;
    let header = &node.text()[..colon.end() - node.start()];
    Some(SyntaxNode::synthetic(node.kind(), &node, header))
}
