//! Bounded member summaries attached to aggregate spans.

pub(super) const MAX_MEMBER_SUMMARY_LEN: usize = 512;

/// Joins `names` with `, ` until the next name would push the listing past
/// `max_len` bytes, then appends `+ N more` for the names left out.
///
/// A first name that alone exceeds `max_len` is cut at a character boundary
/// and marked with `...`.
pub(super) fn summarize_members(names: &[&str], max_len: usize) -> String {
    let mut summary = String::new();
    for (shown, name) in names.iter().enumerate() {
        let separator = if shown == 0 { "" } else { ", " };
        if summary.len() + separator.len() + name.len() > max_len {
            let hidden = names.len() - shown;
            if shown == 0 {
                return elide_first(name, max_len, hidden - 1);
            }
            summary.push_str(&format!(", + {hidden} more"));
            return summary;
        }
        summary.push_str(separator);
        summary.push_str(name);
    }
    summary
}

fn elide_first(name: &str, max_len: usize, hidden: usize) -> String {
    let mut summary: String = name
        .char_indices()
        .take_while(|(idx, ch)| idx + ch.len_utf8() <= max_len)
        .map(|(_, ch)| ch)
        .collect();
    summary.push_str("...");
    if hidden > 0 {
        summary.push_str(&format!(", + {hidden} more"));
    }
    summary
}
