//! Owned syntax tree built from a tree-sitter parse.
//!
//! Parsed nodes share one reference-counted copy of the source and slice
//! their text out of it. Printing walks the children and copies the
//! bytes between them from the parent's text, which makes
//! `parse(src).print() == src` hold byte for byte. A mutation never edits a
//! node: [`SyntaxNode::print_replacing`] emits a replacement node in the
//! target's place and leaves everything else as it was.

use std::ops::{Deref, Range};
use std::sync::Arc;

use tree_sitter::{Parser, TreeCursor};

use crate::error::{MutationError, Result};
use crate::Dialect;

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    kind: &'static str,
    named: bool,
    field: Option<&'static str>,
    start: usize,
    end: usize,
    line: usize,
    column: usize,
    /// Buffer holding this node's text at `span`. Parsed nodes share the
    /// whole source; synthetic nodes own just their replacement text.
    source: Arc<str>,
    span: Range<usize>,
    malformed: bool,
    children: Vec<SyntaxNode>,
}

pub fn parse(source: &str, dialect: Dialect) -> Result<SyntaxNode> {
    let mut parser = Parser::new();
    let language = match dialect {
        Dialect::JavaScript => tree_sitter_javascript::LANGUAGE,
        Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
        Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX,
    };
    parser.set_language(&language.into())?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| MutationError::Parse("parser returned no tree".to_string()))?;

    let shared: Arc<str> = Arc::from(source);
    let mut cursor = tree.walk();
    let mut root = build(&mut cursor, &shared);
    // The root owns the whole buffer, leading and trailing trivia included.
    root.start = 0;
    root.end = source.len();
    root.line = 1;
    root.column = 1;
    root.span = 0..source.len();
    Ok(root)
}

fn build(cursor: &mut TreeCursor, source: &Arc<str>) -> SyntaxNode {
    let node = cursor.node();
    let field = cursor.field_name();

    let mut children = Vec::new();
    if cursor.goto_first_child() {
        loop {
            children.push(build(cursor, source));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    let position = node.start_position();
    SyntaxNode {
        kind: node.kind(),
        named: node.is_named(),
        field,
        start: node.start_byte(),
        end: node.end_byte(),
        line: position.row + 1,
        column: position.column + 1,
        source: Arc::clone(source),
        span: node.start_byte()..node.end_byte(),
        malformed: node.has_error() || node.is_missing(),
        children,
    }
}

impl SyntaxNode {
    /// Leaf node carrying `text` that takes the place of `replaced`.
    pub fn synthetic(kind: &'static str, replaced: &SyntaxNode, text: impl Into<String>) -> Self {
        let text: String = text.into();
        SyntaxNode {
            kind,
            named: true,
            field: replaced.field,
            start: replaced.start,
            end: replaced.end,
            line: replaced.line,
            column: replaced.column,
            span: 0..text.len(),
            source: Arc::from(text),
            malformed: false,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// 1-based line of the first byte.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn text(&self) -> &str {
        &self.source[self.span.clone()]
    }

    /// True when the node is, or contains, an ERROR or MISSING node.
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn named_children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(|c| c.named)
    }

    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// Total number of nodes in this subtree, anonymous tokens included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::count).sum::<usize>()
    }

    pub fn first_error(&self) -> Option<&SyntaxNode> {
        if !self.malformed {
            return None;
        }
        self.children
            .iter()
            .find_map(SyntaxNode::first_error)
            .or(Some(self))
    }

    /// Copy of this node with the direct child `target` swapped out.
    pub fn with_child_replaced(&self, target: &SyntaxNode, replacement: SyntaxNode) -> SyntaxNode {
        let mut node = self.clone();
        if let Some(i) = self.children.iter().position(|c| std::ptr::eq(c, target)) {
            node.children[i] = replacement;
        }
        node
    }

    pub fn print(&self) -> String {
        let mut out = String::with_capacity(self.text().len());
        self.print_into(&mut out, None);
        out
    }

    /// Print the tree with `replacement` emitted in place of `target`.
    /// `target` is matched by identity, so it must be a node of this tree.
    pub fn print_replacing(&self, target: &SyntaxNode, replacement: &SyntaxNode) -> String {
        let mut out = String::with_capacity(self.text().len());
        self.print_into(&mut out, Some((target, replacement)));
        out
    }

    fn print_into(&self, out: &mut String, substitution: Option<(&SyntaxNode, &SyntaxNode)>) {
        if let Some((target, replacement)) = substitution {
            if std::ptr::eq(self, target) {
                replacement.print_into(out, None);
                return;
            }
        }

        let mut cursor = self.start;
        for child in &self.children {
            debug_assert!(child.start >= cursor && child.end <= self.end);
            out.push_str(&self.text()[cursor - self.start..child.start - self.start]);
            child.print_into(out, substitution);
            cursor = child.end;
        }
        out.push_str(&self.text()[cursor - self.start..]);
    }

    /// Depth-first walk, children before parent.
    pub fn walk<'t, F>(&'t self, mut visit: F)
    where
        F: FnMut(NodeRef<'t, '_>),
    {
        let mut ancestors = Vec::new();
        walk_post(self, &mut ancestors, &mut visit);
    }

    /// First value produced by `f` in walk order.
    pub fn find_map<'t, T, F>(&'t self, mut f: F) -> Option<T>
    where
        F: FnMut(NodeRef<'t, '_>) -> Option<T>,
    {
        let mut found = None;
        self.walk(|node| {
            if found.is_none() {
                found = f(node);
            }
        });
        found
    }
}

fn walk_post<'t, F>(node: &'t SyntaxNode, ancestors: &mut Vec<&'t SyntaxNode>, visit: &mut F)
where
    F: FnMut(NodeRef<'t, '_>),
{
    ancestors.push(node);
    for child in &node.children {
        walk_post(child, ancestors, visit);
    }
    ancestors.pop();
    visit(NodeRef {
        node,
        ancestors: ancestors.as_slice(),
    });
}

/// A node seen during a walk, together with the chain of nodes above it.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'t, 'a> {
    node: &'t SyntaxNode,
    ancestors: &'a [&'t SyntaxNode],
}

impl<'t, 'a> NodeRef<'t, 'a> {
    pub fn node(&self) -> &'t SyntaxNode {
        self.node
    }

    pub fn parent(&self) -> Option<&'t SyntaxNode> {
        self.ancestors.last().copied()
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &'t SyntaxNode> + 'a {
        self.ancestors.iter().rev().copied()
    }
}

impl Deref for NodeRef<'_, '_> {
    type Target = SyntaxNode;

    fn deref(&self) -> &SyntaxNode {
        self.node
    }
}
