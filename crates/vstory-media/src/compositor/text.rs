//! Greedy word wrapping for panel captions.

/// Wrap `text` into lines no wider than `max_width`, measuring candidate
/// lines with `measure` (pixels at the compositor's font size).
///
/// Words accumulate greedily until the next word would exceed the width. A
/// single word wider than the panel is hard-broken at the character that
/// fits, so wrapped text never overflows a panel.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure(word) <= max_width {
            current = word.to_string();
        } else {
            current = hard_break(word, max_width, &measure, &mut lines);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Break an over-wide word character by character, pushing full lines and
/// returning the remainder. Each line takes at least one character so the
/// loop always makes progress.
fn hard_break<F>(word: &str, max_width: f32, measure: &F, lines: &mut Vec<String>) -> String
where
    F: Fn(&str) -> f32,
{
    let mut chunk = String::new();
    for ch in word.chars() {
        let mut candidate = chunk.clone();
        candidate.push(ch);
        if !chunk.is_empty() && measure(&candidate) > max_width {
            lines.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        } else {
            chunk = candidate;
        }
    }
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-width fake measurer: 10 px per character.
    fn measure(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = wrap_text("a dog", 100.0, measure);
        assert_eq!(lines, vec!["a dog"]);
    }

    #[test]
    fn test_greedy_wrap() {
        // 12 chars fit per line at width 120
        let lines = wrap_text("a dog runs in the park", 120.0, measure);
        assert_eq!(lines, vec!["a dog runs", "in the park"]);
    }

    #[test]
    fn test_single_word_hard_break() {
        let lines = wrap_text("abcdefghij", 40.0, measure);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
        for line in &lines {
            assert!(measure(line) <= 40.0, "line overflows: {}", line);
        }
    }

    #[test]
    fn test_hard_break_mid_sentence() {
        let lines = wrap_text("hi extraordinarily so", 60.0, measure);
        assert_eq!(lines[0], "hi");
        assert!(lines.iter().all(|l| measure(l) <= 60.0));
        let rejoined: String = lines.join("");
        assert!(rejoined.contains("extraordinarily".replace(' ', "").as_str()));
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(wrap_text("   ", 100.0, measure), vec![String::new()]);
    }

    #[test]
    fn test_narrower_than_one_char_still_progresses() {
        let lines = wrap_text("abc", 5.0, measure);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
