//! Trigger scanner: finds the active `@`/`#` span behind the caret.
//!
//! Pure function, re-run on every text or caret change (typing, paste,
//! programmatic insertion, IME composition).

use super::candidate::TriggerType;

/// Longest query a session may carry before it is torn down
pub const MAX_QUERY_LEN: usize = 20;

/// An active trigger found behind the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerScan {
    pub trigger: TriggerType,
    /// Character offset of the trigger character
    pub start_offset: usize,
    /// `value[start_offset + 1 .. caret]`
    pub query: String,
}

/// Scan with the default query length bound.
pub fn scan(value: &str, caret: usize) -> Option<TriggerScan> {
    scan_with_limit(value, caret, MAX_QUERY_LEN)
}

/// Look backward from `caret` for the nearest trigger character that is
/// not separated from the caret by whitespace and whose query is at most
/// `max_query_len` characters long.
///
/// The nearest trigger wins, so `@ab#cd|` scans as a hashtag with query `cd`.
pub fn scan_with_limit(value: &str, caret: usize, max_query_len: usize) -> Option<TriggerScan> {
    // Byte offset of the caret; `None` when it is past the end
    let end = value
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(value.len()))
        .nth(caret)?;
    let before = &value[..end];

    for (distance, (byte, ch)) in before.char_indices().rev().enumerate() {
        if ch.is_whitespace() {
            break;
        }
        if let Some(trigger) = TriggerType::from_char(ch) {
            let start_offset = caret - distance - 1;
            let query = before[byte + ch.len_utf8()..].to_string();
            tracing::trace!(%trigger, start_offset, query = %query, "trigger found");
            return Some(TriggerScan {
                trigger,
                start_offset,
                query,
            });
        }
        if distance + 1 > max_query_len {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_at_end() {
        let scan = scan("Hello @Jan", 10).unwrap();
        assert_eq!(scan.trigger, TriggerType::Mention);
        assert_eq!(scan.start_offset, 6);
        assert_eq!(scan.query, "Jan");
    }

    #[test]
    fn test_bare_trigger_has_empty_query() {
        let scan = scan("#", 1).unwrap();
        assert_eq!(scan.trigger, TriggerType::Hashtag);
        assert_eq!(scan.query, "");
    }

    #[test]
    fn test_whitespace_closes_trigger() {
        assert!(scan("@Jan ", 5).is_none());
        assert!(scan("@Jan Doe", 8).is_none());
    }

    #[test]
    fn test_last_trigger_wins() {
        let scan = scan("@ab#cd", 6).unwrap();
        assert_eq!(scan.trigger, TriggerType::Hashtag);
        assert_eq!(scan.start_offset, 3);
        assert_eq!(scan.query, "cd");
    }

    #[test]
    fn test_query_length_bound() {
        let twenty = format!("@{}", "a".repeat(20));
        assert!(scan(&twenty, 21).is_some());

        let twenty_one = format!("@{}", "a".repeat(21));
        assert!(scan(&twenty_one, 22).is_none());
    }

    #[test]
    fn test_caret_in_middle() {
        let text = "hi @bob and more";
        let scan = scan(text, 6).unwrap();
        assert_eq!(scan.query, "bo");
    }

    #[test]
    fn test_caret_past_end() {
        assert!(scan("@a", 5).is_none());
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let scan = scan("ça @zoë", 7).unwrap();
        assert_eq!(scan.start_offset, 3);
        assert_eq!(scan.query, "zoë");
    }

    #[test]
    fn test_long_prefix_only_reads_window() {
        let mut text = "ü ".repeat(5_000);
        text.push_str("#pool");
        let caret = text.chars().count();
        let scan = scan(&text, caret).unwrap();
        assert_eq!(scan.start_offset, 10_000);
        assert_eq!(scan.query, "pool");

        let caret_in_prefix = scan_with_limit(&text, 3, 20);
        assert!(caret_in_prefix.is_none());
    }
}
