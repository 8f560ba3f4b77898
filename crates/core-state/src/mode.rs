//! Per-buffer configuration bundle (spec.md §4.10).

use core_search::CaseHandling;

/// Indentation and comment-syntax hints a Mode carries for its language.
#[derive(Clone, Debug)]
pub struct IndentOptions {
    pub width: u32,
    pub tabs: bool,
    pub line_comment: Option<&'static str>,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self { width: 4, tabs: false, line_comment: None }
    }
}

/// A named tokeniser identifier. The tokeniser function itself lives in
/// `core-syntax`; `core-state` only needs to name which one a buffer uses,
/// since `core-syntax` depends on `core-state`'s `Buffer`, not the other
/// way around — naming instead of holding a function pointer avoids the
/// circular dependency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenizerKind {
    PlainText,
    Cpp,
    Markdown,
    ShellScript,
    BufferName,
}

/// Per-buffer configuration: tokeniser choice, search case policy, overlay
/// list (named, not instantiated — `core-overlay` resolves names to
/// implementations), and indent options.
#[derive(Clone, Debug)]
pub struct Mode {
    pub tokenizer: TokenizerKind,
    pub default_case: CaseHandling,
    pub overlays: Vec<String>,
    pub indent: IndentOptions,
}

impl Mode {
    pub fn plaintext() -> Self {
        Self {
            tokenizer: TokenizerKind::PlainText,
            default_case: CaseHandling::SmartCase,
            overlays: vec!["matching-region".to_string()],
            indent: IndentOptions::default(),
        }
    }

    pub fn cpp() -> Self {
        Self {
            tokenizer: TokenizerKind::Cpp,
            default_case: CaseHandling::SmartCase,
            overlays: vec![
                "matching-region".to_string(),
                "matching-tokens".to_string(),
                "nearest-matching-identifier".to_string(),
            ],
            indent: IndentOptions { width: 4, tabs: false, line_comment: Some("//") },
        }
    }

    pub fn markdown() -> Self {
        Self {
            tokenizer: TokenizerKind::Markdown,
            default_case: CaseHandling::SmartCase,
            overlays: vec!["matching-region".to_string()],
            indent: IndentOptions { width: 2, tabs: false, line_comment: None },
        }
    }

    pub fn shell() -> Self {
        Self {
            tokenizer: TokenizerKind::ShellScript,
            default_case: CaseHandling::SmartCase,
            overlays: vec!["matching-region".to_string(), "matching-tokens".to_string()],
            indent: IndentOptions { width: 2, tabs: false, line_comment: Some("#") },
        }
    }

    pub fn buffer_name() -> Self {
        Self {
            tokenizer: TokenizerKind::BufferName,
            default_case: CaseHandling::SmartCase,
            overlays: Vec::new(),
            indent: IndentOptions::default(),
        }
    }
}
