use std::collections::HashSet;

/// Trims every entry, drops empty ones and repeats, keeping first-seen order.
pub fn dedupe<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for item in items {
        let trimmed = item.as_ref().trim();
        if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
            continue;
        }
        unique.push(trimmed.to_string());
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_preserves_first_occurrence() {
        let items = ["egg", "milk", "egg", "flour", "milk"];
        assert_eq!(dedupe(items), vec!["egg", "milk", "flour"]);
    }

    #[test]
    fn test_dedupe_drops_empty_and_compares_trimmed() {
        let items = vec!["", " milk ", "milk", "   ", "egg"];
        assert_eq!(dedupe(items), vec!["milk", "egg"]);
    }

    #[test]
    fn test_dedupe_is_case_sensitive() {
        assert_eq!(dedupe(["Egg", "egg"]), vec!["Egg", "egg"]);
    }

    #[test]
    fn test_dedupe_output_has_no_duplicates_or_empties() {
        let items = ["a", "", "b", "a", " ", "c", "b", "a"];
        let output = dedupe(items);
        let unique: HashSet<_> = output.iter().collect();
        assert_eq!(unique.len(), output.len());
        assert!(output.iter().all(|item| !item.is_empty()));
        assert_eq!(output, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedupe_empty_input() {
        assert!(dedupe(Vec::<String>::new()).is_empty());
    }
}
