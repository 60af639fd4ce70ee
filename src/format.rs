use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const GB: f64 = (1024 * 1024 * 1024) as f64;

/// Bytes to gigabytes, rounded to two decimals.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / GB)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gb_conversion_rounds_to_two_decimals() {
        assert_eq!(bytes_to_gb(0), 0.0);
        assert_eq!(bytes_to_gb(1024 * 1024 * 1024), 1.0);
        assert_eq!(bytes_to_gb(1_500_000_000), 1.4);
        assert_eq!(bytes_to_gb(16 * 1024 * 1024 * 1024), 16.0);
    }

    #[test]
    fn round2_truncates_long_fractions() {
        assert_eq!(round2(1.239), 1.24);
        assert_eq!(round2(1.231), 1.23);
    }

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_unicode("firefox", 20), "firefox");
    }

    #[test]
    fn long_strings_get_an_ellipsis() {
        let truncated = truncate_unicode("a-very-long-process-name", 10);
        assert!(truncated.width() <= 10);
        assert!(truncated.ends_with('\u{2026}'));
    }
}
