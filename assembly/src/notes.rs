//! Free-text annotation for the viewing session.
//!
//! Lives beside the assembly state rather than inside it: switching
//! assemblies leaves the text untouched.

#[cfg(test)]
#[path = "notes_test.rs"]
mod notes_test;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    text: String,
}

impl Notes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Replace the text. No validation or length limit.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}
