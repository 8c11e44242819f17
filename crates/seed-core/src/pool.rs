//! Rotating template pools and author identities.
//!
//! Both types are plain state objects: they are loaded from the store at the
//! start of a run, advanced in memory while records are synthesized, and
//! written back by the orchestrator at item boundaries.

use serde::{Deserialize, Serialize};

/// Which stored template pool a [`Pool`] was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    General,
    Buyer,
    NonBuyer,
}

impl PoolKind {
    pub const ALL: [PoolKind; 3] = [PoolKind::General, PoolKind::Buyer, PoolKind::NonBuyer];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKind::General => "general",
            PoolKind::Buyer => "buyer",
            PoolKind::NonBuyer => "non_buyer",
        }
    }
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, reusable sequence of text templates with a rotation cursor.
///
/// Draws walk the templates in their original order and wrap around, so after
/// `len()` draws every entry has been used exactly once before any repeats.
/// The cursor grows monotonically; only the ledger clear operation resets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    items: Vec<String>,
    cursor: u64,
}

impl Pool {
    /// Create a pool from templates and a previously persisted cursor.
    ///
    /// Blank entries are dropped, every remaining entry is kept verbatim.
    pub fn new(items: Vec<String>, cursor: u64) -> Self {
        let items = items
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .collect();
        Self { items, cursor }
    }

    /// Append templates after the existing ones. Never replaces prior entries.
    pub fn extend<I, S>(&mut self, templates: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.items.len();
        self.items.extend(
            templates
                .into_iter()
                .map(Into::into)
                .filter(|item: &String| !item.trim().is_empty()),
        );
        self.items.len() - before
    }

    /// Return the next template and advance the cursor.
    ///
    /// Returns `None` without touching the cursor when the pool is empty.
    pub fn draw(&mut self) -> Option<&str> {
        let index = self.peek_index()?;
        self.cursor += 1;
        Some(self.items[index].as_str())
    }

    /// Index the next draw would return.
    pub fn peek_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some((self.cursor % self.items.len() as u64) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

/// One configured author. Authors are referenced by position, so two entries
/// with the same name are still distinct rotation slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentity {
    /// Name shown next to the record
    pub display_name: String,

    /// Contact email, empty when not supplied
    #[serde(default)]
    pub email: String,
}

impl AuthorIdentity {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// Parse `Name <email>` or a bare `Name`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some((name, rest)) = line.split_once('<') {
            let email = rest.trim_end().trim_end_matches('>').trim();
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            return Some(Self::new(name, email));
        }

        Some(Self::new(line, ""))
    }
}

/// Round-robin over the configured authors.
///
/// A single rotation is shared by every item of a run. Unlike [`Pool`], the
/// cursor is bounded: it wraps back to zero after the last author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorRotation {
    authors: Vec<AuthorIdentity>,
    cursor: usize,
}

impl AuthorRotation {
    /// Create a rotation starting at `cursor` (taken modulo the author count).
    pub fn new(authors: Vec<AuthorIdentity>, cursor: usize) -> Self {
        let cursor = if authors.is_empty() {
            0
        } else {
            cursor % authors.len()
        };
        Self { authors, cursor }
    }

    /// Return the next author and advance the cursor, wrapping at the end.
    pub fn draw(&mut self) -> Option<&AuthorIdentity> {
        if self.authors.is_empty() {
            return None;
        }
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.authors.len();
        Some(&self.authors[index])
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Split a multi-line template block into one template per non-blank line.
pub fn parse_template_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a multi-line author block into identities, one per non-blank line.
pub fn parse_author_lines(text: &str) -> Vec<AuthorIdentity> {
    text.lines().filter_map(AuthorIdentity::parse).collect()
}
