//! Test fixtures and builders
//!
//! Provides convenient builders for creating mbox data.

use std::path::{Path, PathBuf};

/// Envelope line used by `git format-patch`
pub const ENVELOPE: &str = "From 0123456789abcdef0123456789abcdef01234567 Mon Sep 17 00:00:00 2001";

/// A small well-formed diff
pub const DIFF: &str = "\
 a.txt | 2 +-
 1 file changed, 1 insertion(+), 1 deletion(-)

diff --git a/a.txt b/a.txt
index 1111111..2222222 100644
--- a/a.txt
+++ b/a.txt
@@ -1,3 +1,3 @@
 one
-two
+TWO
 three
-- 
2.43.0
";

/// Builder for one patch e-mail
pub struct PatchBuilder {
    from: String,
    subject: String,
    message: String,
    signed_off: bool,
    diff: Option<String>,
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self {
            from: "Jane Doe <jane@yoctoproject.org>".to_string(),
            subject: "[PATCH] recipe: update to 1.2".to_string(),
            message: "Update the recipe to the latest release.".to_string(),
            signed_off: true,
            diff: Some(DIFF.to_string()),
        }
    }

    pub fn from(mut self, from: &str) -> Self {
        self.from = from.to_string();
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.signed_off = false;
        self
    }

    pub fn without_diff(mut self) -> Self {
        self.diff = None;
        self
    }

    /// Render as one mbox message, envelope line included
    pub fn build(self) -> String {
        let mut out = format!(
            "{ENVELOPE}\nFrom: {}\nDate: Mon, 1 Jan 2024 00:00:00 +0000\nSubject: {}\n\n{}\n",
            self.from, self.subject, self.message
        );
        if self.signed_off {
            out.push_str(&format!("\nSigned-off-by: {}\n", self.from));
        }
        if let Some(diff) = self.diff {
            out.push_str("---\n");
            out.push_str(&diff);
        }
        out
    }
}

impl Default for PatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenate messages into one mbox
pub fn mbox(messages: Vec<String>) -> String {
    messages.concat()
}

/// Write an mbox into `dir`, returning its path
pub fn write_mbox(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write mbox");
    path
}
