use serde::{Deserialize, Serialize};

/// Symbol kinds recognized by the outline scanner.
///
/// Consumers project these onto their own taxonomy (outline views, go-to-symbol
/// indices); the set is closed on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Module,
    Class,
    Struct,
    Enum,
    Function,
    Property,
    Constant,
    Variable,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Function => "function",
            Self::Property => "property",
            Self::Constant => "constant",
            Self::Variable => "variable",
        }
    }

    pub fn parse_kind(s: &str) -> Option<Self> {
        match s {
            "module" | "lib" => Some(Self::Module),
            "class" => Some(Self::Class),
            "struct" | "record" => Some(Self::Struct),
            "enum" | "union" => Some(Self::Enum),
            "function" | "def" | "fun" | "macro" | "method" => Some(Self::Function),
            "property" | "getter" | "setter" | "field" => Some(Self::Property),
            "constant" | "const" => Some(Self::Constant),
            "variable" | "var" => Some(Self::Variable),
            _ => None,
        }
    }

    /// Container kinds can hold nested symbols and become `parent` back-references.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Module | Self::Class | Self::Struct | Self::Enum)
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open line range `[start_line, end_line)`, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub end_line: u32,
}

impl Span {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Span covering exactly one line.
    pub fn single(line: u32) -> Self {
        Self {
            start_line: line,
            end_line: line + 1,
        }
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start_line <= other.start_line && other.end_line <= self.end_line
    }
}

/// One symbol recovered from source text.
///
/// `parent` is the name of the innermost named container open at the time the
/// symbol was recorded. It is informational only, not an ownership relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub name: String,
    pub kind: SymbolKind,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Hex blake3 hash of a source text, used as the outline cache key.
pub fn content_hash(source: &str) -> String {
    blake3::hash(source.as_bytes()).to_hex().to_string()
}

/// Compute a symbol id for downstream index consumers.
/// Format: blake3("symbol_id:v1|{path}|{kind}|{start_line}|{name}")
pub fn compute_symbol_id(path: &str, kind: &SymbolKind, start_line: u32, name: &str) -> String {
    let input = format!(
        "{}|{}|{}|{}|{}",
        crate::constants::SYMBOL_ID_VERSION,
        path,
        kind.as_str(),
        start_line,
        name
    );
    blake3::hash(input.as_bytes()).to_hex().to_string()
}
