const TRUNCATED_MARKER: &str = "\n// ... preview truncated";
pub const MAX_PREVIEW_CONTENT: usize = 64 * 1024;

/// Normalizes line endings and caps the preview at `MAX_PREVIEW_CONTENT` bytes.
pub fn prepare_preview_content(content: &str) -> String {
    let normalized = if content.contains('\r') {
        content.replace("\r\n", "\n")
    } else {
        content.to_string()
    };
    if normalized.len() <= MAX_PREVIEW_CONTENT {
        return normalized;
    }
    let mut end = MAX_PREVIEW_CONTENT;
    while end > 0 && !normalized.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{TRUNCATED_MARKER}", &normalized[..end])
}

#[cfg(test)]
mod tests {
    use super::{prepare_preview_content, MAX_PREVIEW_CONTENT, TRUNCATED_MARKER};

    #[test]
    fn short_content_kept_as_is() {
        assert_eq!(prepare_preview_content("fn main() {}\n"), "fn main() {}\n");
        assert_eq!(prepare_preview_content(""), "");
    }

    #[test]
    fn crlf_is_normalized() {
        assert_eq!(prepare_preview_content("a\r\nb\r\n"), "a\nb\n");
    }

    #[test]
    fn long_content_is_cut_on_char_boundary() {
        let content = "é".repeat(MAX_PREVIEW_CONTENT);
        let preview = prepare_preview_content(&content);
        assert!(preview.ends_with(TRUNCATED_MARKER));
        let body = preview.strip_suffix(TRUNCATED_MARKER).unwrap();
        assert!(body.len() <= MAX_PREVIEW_CONTENT);
        assert!(body.chars().all(|c| c == 'é'));
    }
}
