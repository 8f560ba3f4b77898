//! `Token` and `Token_Type` (spec.md §3, §4.6).

use crate::face::Face;

/// The fixed enum half of a token's type. Mirrors `MAG_TOKEN_TYPES` in the
/// original source, minus nothing — every domain-specific tag (search,
/// directory, blame, patch, build-log buffers) is carried even though this
/// crate only ships tokenisers for a handful of them, since other buffer
/// kinds are expected to reuse the same enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FixedTokenType {
    Default,
    Keyword,
    Type,
    Punctuation,
    OpenPair,
    DividerPair,
    ClosePair,
    Comment,
    DocComment,
    String,
    Identifier,
    Number,
    PreprocessorKeyword,
    PreprocessorIf,
    PreprocessorElse,
    PreprocessorEndif,
    MergeStart,
    MergeMiddle,
    MergeEnd,
    Title,
    Code,
    LinkTitle,
    LinkHref,
    PatchCommitContext,
    PatchFileContext,
    PatchRemove,
    PatchAdd,
    PatchNeutral,
    PatchAnnotation,
    GitRebaseTodoCommand,
    GitRebaseTodoSha,
    GitRebaseTodoCommitMessage,
    ProcessEscapeSequence,
    ProcessBold,
    ProcessItalics,
    ProcessBoldItalics,
    CssProperty,
    CssElementSelector,
    CssIdSelector,
    CssClassSelector,
    CssPseudoSelector,
    HtmlTagName,
    HtmlAttributeName,
    HtmlAmpersandCode,
    DirectoryColumn,
    DirectorySelectedColumn,
    DirectoryFileTime,
    DirectoryFileDirectory,
    DirectoryFileName,
    SearchCommand,
    SearchFileName,
    SearchFileLine,
    SearchFileColumn,
    SearchResult,
    SplashLogo,
    SplashKeyBind,
    BlameHash,
    BlameCommitter,
    BlameDate,
    BlameContents,
    BuildLogFileHeader,
    BuildLogLink,
    BufferTemporaryName,
}

const CUSTOM_BIT: u64 = 0x8000_0000_0000_0000;

/// Either a fixed enum tag or an encoded custom [`Face`] (top bit set).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenType {
    Fixed(FixedTokenType),
    Custom(Face),
}

impl TokenType {
    pub fn to_bits(self) -> u64 {
        match self {
            TokenType::Fixed(kind) => kind as u64,
            TokenType::Custom(face) => face.encode(),
        }
    }

    pub fn from_bits(bits: u64) -> Option<TokenType> {
        if bits & CUSTOM_BIT != 0 {
            Some(TokenType::Custom(Face::decode(bits)))
        } else {
            FIXED_ORDER.get(bits as usize).copied().map(TokenType::Fixed)
        }
    }

    pub fn is_custom(self) -> bool {
        matches!(self, TokenType::Custom(_))
    }
}

// `FixedTokenType as u64` relies on declaration order; this table lets
// `from_bits` invert it without depending on `#[repr]` tricks beyond u8.
const FIXED_ORDER: &[FixedTokenType] = &[
    FixedTokenType::Default,
    FixedTokenType::Keyword,
    FixedTokenType::Type,
    FixedTokenType::Punctuation,
    FixedTokenType::OpenPair,
    FixedTokenType::DividerPair,
    FixedTokenType::ClosePair,
    FixedTokenType::Comment,
    FixedTokenType::DocComment,
    FixedTokenType::String,
    FixedTokenType::Identifier,
    FixedTokenType::Number,
    FixedTokenType::PreprocessorKeyword,
    FixedTokenType::PreprocessorIf,
    FixedTokenType::PreprocessorElse,
    FixedTokenType::PreprocessorEndif,
    FixedTokenType::MergeStart,
    FixedTokenType::MergeMiddle,
    FixedTokenType::MergeEnd,
    FixedTokenType::Title,
    FixedTokenType::Code,
    FixedTokenType::LinkTitle,
    FixedTokenType::LinkHref,
    FixedTokenType::PatchCommitContext,
    FixedTokenType::PatchFileContext,
    FixedTokenType::PatchRemove,
    FixedTokenType::PatchAdd,
    FixedTokenType::PatchNeutral,
    FixedTokenType::PatchAnnotation,
    FixedTokenType::GitRebaseTodoCommand,
    FixedTokenType::GitRebaseTodoSha,
    FixedTokenType::GitRebaseTodoCommitMessage,
    FixedTokenType::ProcessEscapeSequence,
    FixedTokenType::ProcessBold,
    FixedTokenType::ProcessItalics,
    FixedTokenType::ProcessBoldItalics,
    FixedTokenType::CssProperty,
    FixedTokenType::CssElementSelector,
    FixedTokenType::CssIdSelector,
    FixedTokenType::CssClassSelector,
    FixedTokenType::CssPseudoSelector,
    FixedTokenType::HtmlTagName,
    FixedTokenType::HtmlAttributeName,
    FixedTokenType::HtmlAmpersandCode,
    FixedTokenType::DirectoryColumn,
    FixedTokenType::DirectorySelectedColumn,
    FixedTokenType::DirectoryFileTime,
    FixedTokenType::DirectoryFileDirectory,
    FixedTokenType::DirectoryFileName,
    FixedTokenType::SearchCommand,
    FixedTokenType::SearchFileName,
    FixedTokenType::SearchFileLine,
    FixedTokenType::SearchFileColumn,
    FixedTokenType::SearchResult,
    FixedTokenType::SplashLogo,
    FixedTokenType::SplashKeyBind,
    FixedTokenType::BlameHash,
    FixedTokenType::BlameCommitter,
    FixedTokenType::BlameDate,
    FixedTokenType::BlameContents,
    FixedTokenType::BuildLogFileHeader,
    FixedTokenType::BuildLogLink,
    FixedTokenType::BufferTemporaryName,
];

/// `{ start, end, type }` — a lexed span of the buffer (spec.md §3).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    pub start: u64,
    pub end: u64,
    pub kind: TokenType,
}

impl Token {
    pub fn is_valid(&self, contents_len: u64) -> bool {
        self.start <= self.end && self.end <= contents_len
    }

    pub fn contains_position(&self, position: u64) -> bool {
        position >= self.start && position < self.end
    }
}
