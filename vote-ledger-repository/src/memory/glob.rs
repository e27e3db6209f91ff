//! Minimal glob matching for key scans (`*` and `?` only).

pub(crate) fn matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == key[k]) {
            p += 1;
            k += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, k));
            p += 1;
        } else if let Some((star_p, star_k)) = star {
            // backtrack: let the last star absorb one more char
            p = star_p + 1;
            k = star_k + 1;
            star = Some((star_p, star_k + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::matches;

    #[test]
    fn test_prefix_pattern() {
        assert!(matches("item_voted_by:*", "item_voted_by:Norway-1"));
        assert!(matches("item_voted_by:*", "item_voted_by:"));
        assert!(!matches("item_voted_by:*", "vote_counts"));
        assert!(!matches("poll:item_voted_by:*", "item_voted_by:Norway-1"));
    }

    #[test]
    fn test_inner_wildcards() {
        assert!(matches("a*c", "abbbc"));
        assert!(matches("a?c", "abc"));
        assert!(!matches("a?c", "abbc"));
        assert!(matches("exact", "exact"));
        assert!(!matches("exact", "exactly"));
    }
}
