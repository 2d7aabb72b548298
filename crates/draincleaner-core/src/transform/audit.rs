//! Read-only audits of source files: call sites and string literals

use super::syntax::SourceTree;

/// One audited occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditHit {
    /// 1-based line number
    pub line: usize,
    /// Source text reported for the occurrence
    pub text: String,
}

/// Which audit produced a set of hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    /// Calls of the configured diagnostic function
    Calls,
    /// String literals
    Strings,
}

/// Every call of `name`, reported with the stripped physical line of the name
#[must_use]
pub fn find_calls(src: &str, name: &str) -> Vec<AuditHit> {
    let Some(tree) = SourceTree::parse(src) else {
        return Vec::new();
    };
    let lines: Vec<&str> = src.lines().collect();

    tree.calls(name)
        .into_iter()
        .map(|span| AuditHit {
            line: span.line,
            text: lines
                .get(span.line - 1)
                .map_or_else(String::new, |l| l.trim().to_string()),
        })
        .collect()
}

/// Every string literal with the line it starts on
#[must_use]
pub fn find_strings(src: &str) -> Vec<AuditHit> {
    let Some(tree) = SourceTree::parse(src) else {
        return Vec::new();
    };

    tree.strings()
        .into_iter()
        .map(|span| AuditHit {
            line: span.line,
            text: span.text.to_string(),
        })
        .collect()
}
