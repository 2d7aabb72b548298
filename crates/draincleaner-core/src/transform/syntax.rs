//! Syntax tree of Python-style source text
//!
//! Parsing is done by tree-sitter with the Python grammar. The grammar
//! recovers from errors, so broken input still yields the comments and
//! strings of the parts it understands.

use tree_sitter::{Language, Node, Parser, Tree};

/// A node located in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    /// Exact source text
    pub text: &'a str,
    /// 1-based line the node starts on
    pub line: usize,
    /// Byte column within that line
    pub col: usize,
}

/// Parsed source text
pub struct SourceTree<'a> {
    src: &'a str,
    tree: Tree,
}

impl<'a> SourceTree<'a> {
    /// Parse `src`
    ///
    /// Returns `None` only when the grammar cannot be loaded; syntax errors
    /// still produce a tree.
    #[must_use]
    pub fn parse(src: &'a str) -> Option<Self> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        if parser.set_language(&language).is_err() {
            return None;
        }
        let tree = parser.parse(src, None)?;
        Some(Self { src, tree })
    }

    /// Every comment, in source order
    #[must_use]
    pub fn comments(&self) -> Vec<Span<'a>> {
        let mut found = Vec::new();
        walk(&self.tree, |node| {
            if node.kind() == "comment" {
                found.push(self.span(node));
            }
            true
        });
        found
    }

    /// Every outermost string literal, prefix and quotes included
    ///
    /// Strings nested in f-string replacement fields belong to their
    /// enclosing literal and are not listed on their own.
    #[must_use]
    pub fn strings(&self) -> Vec<Span<'a>> {
        let mut found = Vec::new();
        walk(&self.tree, |node| {
            if node.kind() == "string" {
                found.push(self.span(node));
                return false;
            }
            true
        });
        found
    }

    /// The callee name of every call to `name`, plain or as an attribute
    #[must_use]
    pub fn calls(&self, name: &str) -> Vec<Span<'a>> {
        let mut found = Vec::new();
        walk(&self.tree, |node| {
            if node.kind() == "call" {
                let callee = node.child_by_field_name("function").and_then(callee_name);
                if let Some(ident) = callee {
                    let span = self.span(ident);
                    if span.text == name {
                        found.push(span);
                    }
                }
            }
            true
        });
        found
    }

    fn span(&self, node: Node<'_>) -> Span<'a> {
        let start = node.start_position();
        Span {
            text: self.src.get(node.byte_range()).unwrap_or_default(),
            line: start.row + 1,
            col: start.column,
        }
    }
}

/// `f` for `f(...)`, `g` for `obj.g(...)`
fn callee_name(callee: Node<'_>) -> Option<Node<'_>> {
    match callee.kind() {
        "identifier" => Some(callee),
        "attribute" => callee.child_by_field_name("attribute"),
        _ => None,
    }
}

/// Depth-first pre-order walk; `visit` returns whether to descend
fn walk<'t>(tree: &'t Tree, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut cursor = tree.walk();
    loop {
        if visit(cursor.node()) && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}
