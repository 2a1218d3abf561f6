//! Module implementing greedy word wrapping.


/// Break text into lines no wider than `max_width` (as measured by `measure`).
///
/// Words are separated by single spaces and are never split, so a word
/// wider than `max_width` ends up on a line of its own.
/// Empty text results in a single empty line.
pub fn wrap_text<M>(text: &str, max_width: f32, measure: M) -> Vec<String>
    where M: Fn(&str) -> f32
{
    let mut words = text.split(' ');
    let mut lines = vec![];
    let mut current = words.next().unwrap_or("").to_owned();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_owned();
        }
    }
    lines.push(current);
    lines
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::wrap_text;

    /// Every character is 10 units wide.
    fn measure(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn short_text_is_single_line() {
        let lines = wrap_text("Nobody:", 200.0, measure);
        assert_that!(lines).is_equal_to(vec!["Nobody:".to_owned()]);
    }

    #[test]
    fn wraps_greedily() {
        // 11 characters per line fit within 120 units.
        let lines = wrap_text("aaa bbb ccc ddd eee", 120.0, measure);
        assert_that!(lines).is_equal_to(vec![
            "aaa bbb ccc".to_owned(),
            "ddd eee".to_owned(),
        ]);
    }

    #[test]
    fn width_limit_is_exclusive() {
        let lines = wrap_text("aaaa bbbbb", 100.0, measure);
        assert_that!(lines).has_length(2);
    }

    #[test]
    fn never_splits_words() {
        let text = "Jab teacher bole kal test hai aur tum soch rahe ho abhi toh time hai";
        let lines = wrap_text(text, 90.0, measure);
        let rejoined: Vec<_> = lines.iter().flat_map(|l| l.split(' ')).collect();
        let original: Vec<_> = text.split(' ').collect();
        assert_that!(rejoined).is_equal_to(original);
    }

    #[test]
    fn overlong_word_gets_own_line() {
        let lines = wrap_text("a supercalifragilistic b", 50.0, measure);
        assert_that!(lines).is_equal_to(vec![
            "a".to_owned(),
            "supercalifragilistic".to_owned(),
            "b".to_owned(),
        ]);
    }

    #[test]
    fn empty_text() {
        assert_that!(wrap_text("", 100.0, measure)).is_equal_to(vec![String::new()]);
    }

    #[test]
    fn whitespace_only_text() {
        assert_that!(wrap_text("   ", 100.0, measure)).is_equal_to(vec!["   ".to_owned()]);
    }
}
