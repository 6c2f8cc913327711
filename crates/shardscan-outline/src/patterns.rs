//! Line classification for the outline scanner.
//!
//! Each source line is tested against an ordered set of structural patterns;
//! the first match wins. Matching is strictly line-local: constructs that
//! span lines (a parameter list continued on the next line, say) are simply
//! not recognized. That omission is the scanner's only failure mode and it is
//! silent by contract.

use regex::Regex;
use shardscan_core::types::SymbolKind;
use std::sync::LazyLock;

/// What a single line contributes to the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Comment line; never touches the stack, never emits.
    Comment,
    /// `def` / `fun`. Abstract and receiver-qualified forms have no body
    /// and do not open a frame.
    Definition { name: String, opens_body: bool },
    /// `macro`; always opens a body.
    Macro { name: String },
    /// `class` / `struct` / `module` / `lib` / `enum` / `union`, and the
    /// `record` shorthand. `record` without a trailing block stays one line.
    Container {
        name: String,
        kind: SymbolKind,
        opens_body: bool,
    },
    /// `property` / `getter` / `setter` declarations, one name per entry.
    Properties {
        names: Vec<String>,
        opens_block: bool,
    },
    /// `CONST = ...`, `alias X = ...`, `type X = ...`.
    Constant { name: String, opens_block: bool },
    /// `@ivar = ...` / `@@cvar = ...`; recorded as a Property of the nearest
    /// non-function container.
    MemberVariable { name: String, opens_block: bool },
    /// Lowercase `name = ...` / `name : Type` lines.
    LocalVariable { name: String, opens_block: bool },
    /// `end`, optionally with a trailing method call.
    BlockClose,
    /// Control-flow keyword or trailing `do`; opens an anonymous frame.
    BlockOpen,
}

static DEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:private\s+|protected\s+)*(?:(abstract)\s+)?(?:private\s+|protected\s+)*(?:def|fun)\s+(?:(self|[A-Z]\w*(?:::[A-Z]\w*)*)\.)?([a-z_]\w*[?!=]?|\[\]=?|[+\-*/%<>=!~^&|]+)",
    )
    .expect("definition pattern must compile")
});

static MACRO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:private\s+)?macro\s+([a-z_]\w*[?!=]?)")
        .expect("macro pattern must compile")
});

static CONTAINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:private\s+|abstract\s+)*(class|struct|module|lib|enum|union)\s+([A-Z]\w*(?:::[A-Z]\w*)*)",
    )
    .expect("container pattern must compile")
});

static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:private\s+)?record\s+([A-Z]\w*(?:::[A-Z]\w*)*)")
        .expect("record pattern must compile")
});

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:private\s+|protected\s+)?(?:class_)?(?:property|getter|setter)[?!]?\s+(\S.*)$",
    )
    .expect("property pattern must compile")
});

static PROPERTY_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:?([a-z_]\w*)\s*(?:[:=].*)?$").expect("property name pattern must compile")
});

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:private\s+)?(?:alias|type)\s+([A-Z]\w*(?:::[A-Z]\w*)*)\s*=")
        .expect("alias pattern must compile")
});

static CONST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Z]\w*(?:::[A-Z]\w*)*)\s*(?::\s*[^=]+)?=\s*(\S.*)?$")
        .expect("constant pattern must compile")
});

static IVAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@@?([a-z_]\w*)\s*(?::\s*[^=]+)?=\s*(\S.*)?$")
        .expect("member variable pattern must compile")
});

static LVAR_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([a-z_]\w*)\s*(?::\s*[^=]+)?=\s*(\S.*)?$")
        .expect("variable assignment pattern must compile")
});

// The colon must be followed by whitespace: `x : Int32` is a type
// annotation, `when :stop` or `puts :done` is a symbol-literal argument.
static LVAR_TYPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([a-z_]\w*)\s*:\s+[^=]+$").expect("typed variable pattern must compile")
});

static END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*end\s*(?:\..*)?\s*(?:#.*)?$").expect("block close pattern must compile")
});

static OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:if|unless|until|while|case|select|begin)\b")
        .expect("block opener pattern must compile")
});

static DO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdo(?:\s*\|[^|]*\|)?\s*$").expect("trailing do pattern must compile")
});

static RHS_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:if|unless|until|while|case|select|begin)\b")
        .expect("assignment rhs opener pattern must compile")
});

/// True when the line ends with `do` or `do |params|`.
fn ends_with_block_opener(line: &str) -> bool {
    DO_RE.is_match(line)
}

/// True when an assignment right-hand side itself opens a block
/// (`x = if cond`, `y = begin`), or the whole line trails into a `do` block.
fn assignment_opens_block(line: &str, rhs: Option<&str>) -> bool {
    rhs.is_some_and(|r| RHS_BLOCK_RE.is_match(r)) || ends_with_block_opener(line)
}

/// A captured `= rhs` that is actually `==`, `=~`, or `=>` is not an
/// assignment; the pattern must not fire for comparisons or hash literals.
fn rhs_is_assignment(rhs: Option<&str>) -> bool {
    match rhs {
        Some(rest) => !rest.starts_with(['=', '~', '>']),
        None => true,
    }
}

/// Classify one line. `None` means the line is inert: no symbol, no stack
/// change. Patterns are tested in a fixed order and the first match wins.
pub fn classify(line: &str) -> Option<LineEvent> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') && !trimmed.starts_with("#{") {
        return Some(LineEvent::Comment);
    }

    if let Some(caps) = DEF_RE.captures(line) {
        let is_abstract = caps.get(1).is_some();
        let has_receiver = caps.get(2).is_some();
        return Some(LineEvent::Definition {
            name: caps[3].to_string(),
            opens_body: !is_abstract && !has_receiver,
        });
    }

    if let Some(caps) = MACRO_RE.captures(line) {
        return Some(LineEvent::Macro {
            name: caps[1].to_string(),
        });
    }

    if let Some(caps) = CONTAINER_RE.captures(line) {
        // parse_kind covers every keyword the pattern can produce
        let kind = SymbolKind::parse_kind(&caps[1])?;
        return Some(LineEvent::Container {
            name: caps[2].to_string(),
            kind,
            opens_body: true,
        });
    }

    if let Some(caps) = RECORD_RE.captures(line) {
        return Some(LineEvent::Container {
            name: caps[1].to_string(),
            kind: SymbolKind::Struct,
            opens_body: ends_with_block_opener(line),
        });
    }

    if let Some(caps) = PROPERTY_RE.captures(line) {
        let names = caps[1]
            .split(',')
            .filter_map(|segment| {
                PROPERTY_NAME_RE
                    .captures(segment)
                    .map(|c| c[1].to_string())
            })
            .collect();
        return Some(LineEvent::Properties {
            names,
            opens_block: ends_with_block_opener(line),
        });
    }

    if let Some(caps) = ALIAS_RE.captures(line) {
        return Some(LineEvent::Constant {
            name: caps[1].to_string(),
            opens_block: false,
        });
    }

    if let Some(caps) = CONST_RE.captures(line) {
        let rhs = caps.get(2).map(|m| m.as_str());
        if rhs_is_assignment(rhs) {
            return Some(LineEvent::Constant {
                name: caps[1].to_string(),
                opens_block: assignment_opens_block(line, rhs),
            });
        }
    }

    if let Some(caps) = IVAR_RE.captures(line) {
        let rhs = caps.get(2).map(|m| m.as_str());
        if rhs_is_assignment(rhs) {
            return Some(LineEvent::MemberVariable {
                name: caps[1].to_string(),
                opens_block: assignment_opens_block(line, rhs),
            });
        }
    }

    if let Some(caps) = LVAR_ASSIGN_RE.captures(line) {
        let rhs = caps.get(2).map(|m| m.as_str());
        if rhs_is_assignment(rhs) {
            return Some(LineEvent::LocalVariable {
                name: caps[1].to_string(),
                opens_block: assignment_opens_block(line, rhs),
            });
        }
    }

    if let Some(caps) = LVAR_TYPED_RE.captures(line) {
        return Some(LineEvent::LocalVariable {
            name: caps[1].to_string(),
            opens_block: false,
        });
    }

    if END_RE.is_match(line) {
        return Some(LineEvent::BlockClose);
    }

    if OPENER_RE.is_match(line) || ends_with_block_opener(line) {
        return Some(LineEvent::BlockOpen);
    }

    None
}
