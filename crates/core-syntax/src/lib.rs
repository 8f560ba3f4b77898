//! Token types, the per-language tokeniser contract, and the incremental
//! Token Cache that ties tokenisation to a buffer's change log (spec.md
//! §3, §4.5, §4.6).

mod checkpoint;
mod face;
mod lang;
mod token;
mod tokenizer;

pub use checkpoint::{DEFAULT_CHECK_POINT_INTERVAL, TokenCache, TokenizerCheckPoint};
pub use face::{Face, FaceColor, FaceFlags};
pub use lang::buffer_name::BufferNameTokenizer;
pub use lang::cpp::CppTokenizer;
pub use lang::markdown::MarkdownTokenizer;
pub use lang::plaintext::PlainTextTokenizer;
pub use lang::shell::ShellTokenizer;
pub use token::{FixedTokenType, Token, TokenType};
pub use tokenizer::Tokenizer;

/// Resolves a `core_state::TokenizerKind` to its `Tokenizer` implementation.
/// Lives here (not in `core-state`) to keep the dependency edge one-way:
/// `core-state` names tokenisers, `core-syntax` knows how to run them.
pub fn tokenizer_for(kind: core_state::TokenizerKind) -> &'static dyn Tokenizer {
    use core_state::TokenizerKind::*;
    match kind {
        PlainText => &PlainTextTokenizer,
        Cpp => &CppTokenizer,
        Markdown => &MarkdownTokenizer,
        ShellScript => &ShellTokenizer,
        BufferName => &BufferNameTokenizer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_for_resolves_every_kind() {
        for kind in [
            core_state::TokenizerKind::PlainText,
            core_state::TokenizerKind::Cpp,
            core_state::TokenizerKind::Markdown,
            core_state::TokenizerKind::ShellScript,
            core_state::TokenizerKind::BufferName,
        ] {
            let _: &dyn Tokenizer = tokenizer_for(kind);
        }
    }
}
