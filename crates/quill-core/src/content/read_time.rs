//! Reading-time estimation.

const WORDS_PER_MINUTE: usize = 200;

/// Estimate reading time from whitespace-delimited word count at 200 wpm,
/// rounded up. Empty content reports one minute rather than zero.
pub fn calculate_read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_clamps_to_one_minute() {
        assert_eq!(calculate_read_time(""), "1 min read");
        assert_eq!(calculate_read_time("   \n\t "), "1 min read");
    }

    #[test]
    fn single_word_is_one_minute() {
        assert_eq!(calculate_read_time("hello"), "1 min read");
    }

    #[test]
    fn rounds_up_partial_minutes() {
        let words = vec!["word"; 250].join(" ");
        assert_eq!(calculate_read_time(&words), "2 min read");
    }

    #[test]
    fn exact_multiple_does_not_round_up() {
        let words = vec!["word"; 400].join(" ");
        assert_eq!(calculate_read_time(&words), "2 min read");
    }
}
