//! Submissions found in a range of messages.

use crate::model::message::{AttachmentRef, AuthorRef};

/// All submitted attachments of one author, in message scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSubmissions {
    pub author: AuthorRef,
    pub attachments: Vec<AttachmentRef>,
}

/// Mapping from author to their submitted attachments.
///
/// Authors keep the order in which their first submission was found. An author is
/// present only if at least one attachment was recorded for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionIndex {
    entries: Vec<AuthorSubmissions>,
    /// Number of messages counted as submissions.
    pub submission_message_count: u32,
}

impl SubmissionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one submission message: bumps the message count and appends its
    /// attachments to the author's entry.
    pub fn record_message(&mut self, author: &AuthorRef, attachments: &[AttachmentRef]) {
        self.submission_message_count += 1;

        if attachments.is_empty() {
            return;
        }

        match self.entries.iter_mut().find(|e| e.author.id == author.id) {
            Some(entry) => entry.attachments.extend_from_slice(attachments),
            None => self.entries.push(AuthorSubmissions {
                author: author.clone(),
                attachments: attachments.to_vec(),
            }),
        }
    }

    pub fn entries(&self) -> &[AuthorSubmissions] {
        &self.entries
    }

    pub fn get(&self, author_id: u64) -> Option<&AuthorSubmissions> {
        self.entries.iter().find(|e| e.author.id == author_id)
    }

    /// Total number of attachments across all authors.
    pub fn total_submissions(&self) -> usize {
        self.entries.iter().map(|e| e.attachments.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that attachments from several messages of one author accumulate in order.
    ///
    /// Expected: one author entry with three attachments, two messages counted
    #[test]
    fn accumulates_per_author_in_order() {
        let alice = AuthorRef::new(1, "alice");
        let mut index = SubmissionIndex::new();
        index.record_message(&alice, &[AttachmentRef::new("u1", "a.png")]);
        index.record_message(
            &alice,
            &[AttachmentRef::new("u2", "b.png"), AttachmentRef::new("u3", "c.png")],
        );

        assert_eq!(index.entries().len(), 1);
        let names: Vec<&str> = index.get(1).unwrap().attachments.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
        assert_eq!(index.submission_message_count, 2);
        assert_eq!(index.total_submissions(), 3);
    }

    /// Tests that an author without attachments never gets an entry.
    ///
    /// Expected: index stays empty
    #[test]
    fn no_entry_without_attachments() {
        let mut index = SubmissionIndex::new();
        index.record_message(&AuthorRef::new(2, "bob"), &[]);
        assert!(index.is_empty());
        assert!(index.get(2).is_none());
    }
}
