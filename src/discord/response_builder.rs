//! Text for every message the bot posts.
//!
//! Keeping the wording in one place lets the worker stay transport-agnostic and
//! keeps the user-facing strings under test.

/// Discord rejects message content longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Body of the editable progress message.
///
/// # Examples
///
/// ```
/// use recap::discord::response_builder::status_text;
///
/// assert_eq!(status_text("alice", 3), "Fetching messages: alice\nMessages fetched: 3");
/// ```
#[must_use]
pub fn status_text(user_tag: &str, total: usize) -> String {
    format!("Fetching messages: {user_tag}\nMessages fetched: {total}")
}

#[must_use]
pub fn summary_heading(user_tag: &str) -> String {
    format!("**Summary of {user_tag}'s messages:**")
}

#[must_use]
pub fn no_messages_text(user_tag: &str) -> String {
    format!("No messages from {user_tag} in the past 12 months.")
}

/// Heading plus summary, split into messages that fit Discord's length limit.
#[must_use]
pub fn summary_messages(user_tag: &str, summary: &str) -> Vec<String> {
    let full = format!("{}\n{}", summary_heading(user_tag), summary);
    split_message(&full, DISCORD_MESSAGE_LIMIT)
}

/// Split `content` into chunks of at most `max_length` characters, breaking on
/// line boundaries where possible and inside a line only when it alone is too long.
#[must_use]
pub fn split_message(content: &str, max_length: usize) -> Vec<String> {
    if content.chars().count() <= max_length {
        return vec![content.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in content.lines() {
        let line_len = line.chars().count();
        let needed = if current.is_empty() {
            line_len
        } else {
            line_len + 1
        };

        if current_len + needed > max_length && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_length {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_length) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
