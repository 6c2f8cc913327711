use shardscan_core::types::SymbolKind;

/// A stack entry for one currently-open block construct.
///
/// Popping a frame always corresponds 1:1 to consuming one `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Opened by a symbol-introducing construct; `record` indexes the
    /// in-flight record whose end line is finalized when this frame pops.
    Named {
        name: String,
        kind: SymbolKind,
        start_line: u32,
        record: usize,
    },
    /// Control-flow or trailing-`do` block, tracked only for nesting depth.
    Anonymous { start_line: u32 },
}

impl Frame {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            Self::Named {
                kind: SymbolKind::Function,
                ..
            }
        )
    }

    /// The name this frame contributes as a parent, if it is a named container.
    /// Function frames hold no nested members.
    pub fn container_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, kind, .. } if kind.is_container() => Some(name),
            _ => None,
        }
    }

    pub fn start_line(&self) -> u32 {
        match self {
            Self::Named { start_line, .. } | Self::Anonymous { start_line } => *start_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_name_only_for_container_kinds() {
        let class = Frame::Named {
            name: "Foo".into(),
            kind: SymbolKind::Class,
            start_line: 0,
            record: 0,
        };
        let method = Frame::Named {
            name: "bar".into(),
            kind: SymbolKind::Function,
            start_line: 1,
            record: 1,
        };
        let block = Frame::Anonymous { start_line: 2 };

        assert_eq!(class.container_name(), Some("Foo"));
        assert_eq!(method.container_name(), None);
        assert_eq!(block.container_name(), None);
    }

    #[test]
    fn frame_predicates() {
        let method = Frame::Named {
            name: "bar".into(),
            kind: SymbolKind::Function,
            start_line: 1,
            record: 0,
        };
        assert!(method.is_function());
        assert!(!method.is_anonymous());

        let block = Frame::Anonymous { start_line: 4 };
        assert!(block.is_anonymous());
        assert!(!block.is_function());
        assert_eq!(block.start_line(), 4);
    }
}
