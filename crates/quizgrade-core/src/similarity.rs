//! Character similarity used for partial credit.
//!
//! The measure recursively takes the longest common substring of the two
//! inputs and then repeats on the unmatched text to its left and right. The
//! total number of matched characters `m` gives a percentage of
//! `2m / (len(a) + len(b)) * 100`.

/// Number of characters the two strings have in common, by recursive
/// longest-common-substring matching.
pub fn common_chars(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    common_chars_in(&a, &b)
}

fn common_chars_in(a: &[char], b: &[char]) -> usize {
    let (pos_a, pos_b, len) = longest_common_substring(a, b);
    if len == 0 {
        return 0;
    }
    len + common_chars_in(&a[..pos_a], &b[..pos_b])
        + common_chars_in(&a[pos_a + len..], &b[pos_b + len..])
}

/// Leftmost longest common substring as `(start_in_a, start_in_b, length)`.
/// Ties keep the first match found scanning `a` then `b`.
fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut k = 0;
            while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
                k += 1;
            }
            if k > best.2 {
                best = (i, j, k);
            }
        }
    }
    best
}

/// Similarity of two strings as a percentage in `[0, 100]`.
pub fn similarity_percent(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 0.0;
    }
    common_chars(a, b) as f64 * 2.0 * 100.0 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_are_fully_similar() {
        assert_eq!(similarity_percent("photosynthesis", "photosynthesis"), 100.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity_percent("abc", "xyz"), 0.0);
        assert_eq!(similarity_percent("", ""), 0.0);
        assert_eq!(similarity_percent("abc", ""), 0.0);
    }

    #[test]
    fn plural_is_close() {
        // "cat" in common: 2 * 3 / 7
        let p = similarity_percent("cats", "cat");
        assert!((p - 85.714).abs() < 0.01, "got {p}");
    }

    #[test]
    fn recursion_picks_up_both_sides() {
        // "llo W", then "H" to the left and "rld" to the right
        assert_eq!(common_chars("Hello World", "Hallo Wrld"), 9);
    }

    #[test]
    fn symmetric_length_normalisation() {
        let p = similarity_percent("colour", "color");
        assert!(p > 90.0 && p < 91.0, "got {p}");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(similarity_percent("café", "café"), 100.0);
        assert_eq!(common_chars("naïve", "naive"), 4);
    }
}
