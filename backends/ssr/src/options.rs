use serde::{Deserialize, Serialize};

/// Options for [`render_document`](crate::render_document).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsrOptions {
    /// Prefix the document with `<!DOCTYPE html>`.
    pub doctype: bool,
}
