//! Single-pass outline scanner.
//!
//! Walks a source buffer line by line, feeding each line through
//! [`patterns::classify`] and maintaining a stack of open blocks. Symbols are
//! emitted in source order; container spans are finalized when their `end`
//! line is consumed, or at EOF for unclosed blocks.

use crate::frame::Frame;
use crate::patterns::{self, LineEvent};
use shardscan_core::types::{Span, SymbolKind, SymbolRecord};
use tracing::trace;

/// A symbol whose end line may still be pending while its frame is open.
struct Pending {
    name: String,
    kind: SymbolKind,
    start_line: u32,
    end_line: Option<u32>,
    parent: Option<String>,
}

impl Pending {
    fn finalize(self, fallback_end: u32) -> SymbolRecord {
        let end = self.end_line.unwrap_or(fallback_end);
        SymbolRecord {
            name: self.name,
            kind: self.kind,
            span: Span::new(self.start_line, end),
            parent: self.parent,
        }
    }
}

/// Innermost open named container, skipping functions and anonymous blocks.
fn current_parent(stack: &[Frame]) -> Option<String> {
    stack
        .iter()
        .rev()
        .find_map(|frame| frame.container_name().map(str::to_string))
}

/// Scan `source` and return its symbol outline in source order.
///
/// The scan is infallible: lines that match no pattern are skipped, an
/// unbalanced `end` is a no-op, and blocks still open at EOF extend to the
/// end of the buffer.
pub fn scan(source: &str) -> Vec<SymbolRecord> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut line_count: u32 = 0;

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx as u32;
        line_count = line_no + 1;

        let Some(event) = patterns::classify(line) else {
            continue;
        };

        match event {
            LineEvent::Comment => {}

            LineEvent::Definition { name, opens_body } => {
                let record =
                    push_pending(&mut pending, &stack, name.clone(), SymbolKind::Function, line_no);
                if opens_body {
                    stack.push(Frame::Named {
                        name,
                        kind: SymbolKind::Function,
                        start_line: line_no,
                        record,
                    });
                } else {
                    pending[record].end_line = Some(line_no + 1);
                }
            }

            LineEvent::Macro { name } => {
                let record =
                    push_pending(&mut pending, &stack, name.clone(), SymbolKind::Function, line_no);
                stack.push(Frame::Named {
                    name,
                    kind: SymbolKind::Function,
                    start_line: line_no,
                    record,
                });
            }

            LineEvent::Container {
                name,
                kind,
                opens_body,
            } => {
                let record = push_pending(&mut pending, &stack, name.clone(), kind, line_no);
                if opens_body {
                    stack.push(Frame::Named {
                        name,
                        kind,
                        start_line: line_no,
                        record,
                    });
                } else {
                    pending[record].end_line = Some(line_no + 1);
                }
            }

            LineEvent::Properties { names, opens_block } => {
                if !in_function_body(&stack) {
                    for name in names {
                        let record =
                            push_pending(&mut pending, &stack, name, SymbolKind::Property, line_no);
                        pending[record].end_line = Some(line_no + 1);
                    }
                }
                if opens_block {
                    stack.push(Frame::Anonymous { start_line: line_no });
                }
            }

            LineEvent::Constant { name, opens_block } => {
                let record =
                    push_pending(&mut pending, &stack, name, SymbolKind::Constant, line_no);
                pending[record].end_line = Some(line_no + 1);
                if opens_block {
                    stack.push(Frame::Anonymous { start_line: line_no });
                }
            }

            LineEvent::MemberVariable { name, opens_block } => {
                if !in_function_body(&stack) {
                    let record =
                        push_pending(&mut pending, &stack, name, SymbolKind::Property, line_no);
                    pending[record].end_line = Some(line_no + 1);
                }
                if opens_block {
                    stack.push(Frame::Anonymous { start_line: line_no });
                }
            }

            LineEvent::LocalVariable { name, opens_block } => {
                if !in_suppressing_scope(&stack) {
                    let record =
                        push_pending(&mut pending, &stack, name, SymbolKind::Variable, line_no);
                    pending[record].end_line = Some(line_no + 1);
                }
                if opens_block {
                    stack.push(Frame::Anonymous { start_line: line_no });
                }
            }

            LineEvent::BlockClose => match stack.pop() {
                // The closing line itself is excluded from the span.
                Some(Frame::Named { record, .. }) => {
                    pending[record].end_line = Some(line_no);
                }
                Some(Frame::Anonymous { .. }) => {}
                // stray `end`; nothing to close
                None => {}
            },

            LineEvent::BlockOpen => {
                stack.push(Frame::Anonymous { start_line: line_no });
            }
        }
    }

    for frame in &stack {
        trace!(start_line = frame.start_line(), "block still open at EOF");
    }

    pending
        .into_iter()
        .map(|p| p.finalize(line_count))
        .collect()
}

fn push_pending(
    pending: &mut Vec<Pending>,
    stack: &[Frame],
    name: String,
    kind: SymbolKind,
    start_line: u32,
) -> usize {
    pending.push(Pending {
        name,
        kind,
        start_line,
        end_line: None,
        parent: current_parent(stack),
    });
    pending.len() - 1
}

/// Instance variables are declarations at type scope; inside a method body
/// they are assignments and carry no outline value.
fn in_function_body(stack: &[Frame]) -> bool {
    stack.last().is_some_and(Frame::is_function)
}

/// Local variables are suppressed inside method bodies and inside any
/// anonymous block, where they are almost never declarations.
fn in_suppressing_scope(stack: &[Frame]) -> bool {
    stack
        .last()
        .is_some_and(|f| f.is_function() || f.is_anonymous())
}
