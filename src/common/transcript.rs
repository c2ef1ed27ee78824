use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

/// Substituted when a ticket is closed before anyone wrote in it.
pub const EMPTY_PLACEHOLDER: &str = "No messages were sent in this ticket.";

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One message of a ticket's history, stripped down to what the flat log
/// keeps. Attachment and embed contents are not captured.
pub struct TranscriptEntry {
    pub sent_at: OffsetDateTime,
    pub author: String,
    pub content: String,
}

/// Renders a ticket's history, oldest first, one line per message.
pub fn render_transcript(entries: &[TranscriptEntry]) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_PLACEHOLDER}\n");
    }

    let mut transcript = String::new();
    for entry in entries {
        let timestamp = entry
            .sent_at
            .format(TIMESTAMP_FORMAT)
            .unwrap_or_else(|_| entry.sent_at.unix_timestamp().to_string());
        transcript.push_str(&format!(
            "[{timestamp}] {}: {}\n",
            entry.author, entry.content
        ));
    }
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(unix: i64, author: &str, content: &str) -> TranscriptEntry {
        TranscriptEntry {
            sent_at: OffsetDateTime::from_unix_timestamp(unix).unwrap(),
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn one_line_per_message() {
        let entries = vec![
            entry(1_700_000_000, "alice#0", "hi, my bot broke"),
            entry(1_700_000_060, "staff#0", "looking into it"),
            entry(1_700_000_120, "alice#0", "thanks"),
        ];

        let transcript = render_transcript(&entries);
        assert_eq!(transcript.lines().count(), entries.len());
    }

    #[test]
    fn lines_carry_timestamp_author_and_content() {
        let transcript = render_transcript(&[entry(1_700_000_000, "alice#0", "hello")]);
        assert_eq!(transcript, "[2023-11-14 22:13:20] alice#0: hello\n");
    }

    #[test]
    fn empty_history_uses_the_placeholder() {
        let transcript = render_transcript(&[]);
        assert_eq!(transcript.lines().count(), 1);
        assert!(transcript.contains(EMPTY_PLACEHOLDER));
    }
}
