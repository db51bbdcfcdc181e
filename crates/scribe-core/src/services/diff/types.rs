use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    Context,
    Add,
    Remove,
}

/// One body line of a unified diff patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchLine {
    pub change_type: ChangeType,
    /// Line content without the leading marker
    pub content: String,
    /// Line number in the new file; `None` for removed lines
    pub new_line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// `@@ -a,b +c,d @@`; only the new-file start matters for anchoring
pub struct HunkHeader {
    pub new_start: u32,
}
