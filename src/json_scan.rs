use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Type of a JSON node found by the scanner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeType {
    Object,
    Array,
}

/// Byte coordinates of a balanced JSON structure within a larger text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjCoords {
    pub start: usize,
    pub end: usize, // inclusive index of the closing bracket/brace
    pub kind: NodeType,
}

impl ObjCoords {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..=self.end]
    }
}

/// Find all top-level JSON object/array structures in the given text.
///
/// String literals are skipped so braces inside them do not count. Mismatched
/// closers discard the open frame.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn find_json_structures(text: &str) -> Vec<ObjCoords> {
    let bytes = text.as_bytes();
    let mut results: Vec<ObjCoords> = Vec::new();
    let mut stack: Vec<(usize, NodeType)> = Vec::new();

    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let closing = match b {
            b'"' => {
                in_string = true;
                None
            }
            b'{' => {
                stack.push((i, NodeType::Object));
                None
            }
            b'[' => {
                stack.push((i, NodeType::Array));
                None
            }
            b'}' => Some(NodeType::Object),
            b']' => Some(NodeType::Array),
            _ => None,
        };

        if let Some(kind) = closing {
            if let Some((start, open_kind)) = stack.pop() {
                if open_kind == kind && stack.is_empty() {
                    results.push(ObjCoords { start, end: i, kind });
                }
            }
        }
    }

    debug!(count = results.len(), "found root structures");
    results
}

/// First top-level JSON object in the text.
pub fn first_object(text: &str) -> Option<&str> {
    find_json_structures(text)
        .into_iter()
        .find(|node| node.kind == NodeType::Object)
        .map(|node| node.slice(text))
}
