use super::*;
use crate::service::selection::filter::SubmissionFilter;

/// Tests that a reaction by someone other than the author does not count.
///
/// Expected: empty index and zero submission messages
#[tokio::test]
async fn reaction_by_other_user_is_ignored() {
    let alice = AuthorRef::new(1, "alice");
    let messages = vec![marked_message(10, &alice, &["art.png"])];
    let source = FakeHistory::new(messages.clone()).with_reactors(10, vec![2]);

    let index = SubmissionFilter::new(&source)
        .filter(9, &messages, &marker())
        .await
        .unwrap();

    assert!(index.is_empty());
    assert_eq!(index.submission_message_count, 0);
}

/// Tests that a self-reaction marks all attachments of the message.
///
/// Expected: author entry with both files in message order, one message counted
#[tokio::test]
async fn self_reaction_marks_all_attachments() {
    let alice = AuthorRef::new(1, "alice");
    let messages = vec![marked_message(10, &alice, &["a.png", "b.png"])];
    let source = FakeHistory::new(messages.clone()).with_reactors(10, vec![2, 1]);

    let index = SubmissionFilter::new(&source)
        .filter(9, &messages, &marker())
        .await
        .unwrap();

    assert_eq!(index.submission_message_count, 1);
    let files: Vec<&str> = index.get(1).unwrap().attachments.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(files, ["a.png", "b.png"]);
}

/// Tests that messages without attachments or without the marker are skipped
/// without querying reactions.
///
/// Expected: only the marked message with attachments triggers a reaction lookup
#[tokio::test]
async fn skips_cheaply_before_querying_reactions() {
    let alice = AuthorRef::new(1, "alice");
    let mut no_attachments = marked_message(10, &alice, &[]);
    no_attachments.reactions = vec![marker()];
    let mut other_emoji = marked_message(11, &alice, &["x.png"]);
    other_emoji.reactions = vec![EmojiRef::unicode("❌")];
    let submission = marked_message(12, &alice, &["y.png"]);

    let messages = vec![no_attachments, other_emoji, submission];
    let source = FakeHistory::new(messages.clone())
        .with_reactors(10, vec![1])
        .with_reactors(11, vec![1])
        .with_reactors(12, vec![1]);

    let index = SubmissionFilter::new(&source)
        .filter(9, &messages, &marker())
        .await
        .unwrap();

    assert_eq!(source.reaction_requests.load(Ordering::SeqCst), 1);
    assert_eq!(index.total_submissions(), 1);
}

/// Tests that a custom marker matches reactions by ID even after a rename.
///
/// Expected: reaction `<:old:123>` matches configured `<:new:123>`
#[tokio::test]
async fn custom_marker_matches_by_id() {
    let alice = AuthorRef::new(1, "alice");
    let mut message = marked_message(10, &alice, &["a.png"]);
    message.reactions = vec![EmojiRef::custom(123, "old")];
    let messages = vec![message];
    let source = FakeHistory::new(messages.clone()).with_reactors(10, vec![1]);

    let index = SubmissionFilter::new(&source)
        .filter(9, &messages, &EmojiRef::custom(123, "new"))
        .await
        .unwrap();

    assert_eq!(index.submission_message_count, 1);
}

/// Tests that filtering twice yields the same result and leaves the input alone.
///
/// Expected: identical indexes, unchanged messages
#[tokio::test]
async fn refiltering_is_idempotent() {
    let alice = AuthorRef::new(1, "alice");
    let bob = AuthorRef::new(2, "bob");
    let messages = vec![
        marked_message(10, &alice, &["a.png"]),
        marked_message(11, &bob, &["b.png", "c.png"]),
        marked_message(12, &alice, &["d.png"]),
    ];
    let snapshot = messages.clone();
    let source = FakeHistory::new(messages.clone())
        .with_reactors(10, vec![1])
        .with_reactors(11, vec![2])
        .with_reactors(12, vec![1]);
    let filter = SubmissionFilter::new(&source);

    let first = filter.filter(9, &messages, &marker()).await.unwrap();
    let second = filter.filter(9, &messages, &marker()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(messages, snapshot);
    assert_eq!(first.submission_message_count, 3);
    assert_eq!(first.entries()[0].author, alice);
    assert_eq!(first.get(1).unwrap().attachments.len(), 2);
}
