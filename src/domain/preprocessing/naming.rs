//! Output column naming.

use std::collections::HashSet;

/// Replace every character that is not ASCII alphanumeric with `_`
#[must_use]
pub fn sanitize(level: &str) -> String {
    if level.is_empty() {
        return "blank".to_string();
    }
    level
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Hands out column names that are unique within one output table
#[derive(Debug, Default)]
pub struct OutputNamer {
    taken: HashSet<String>,
}

impl OutputNamer {
    pub fn new<I>(reserved: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            taken: reserved.into_iter().map(Into::into).collect(),
        }
    }

    /// Return `candidate`, or `candidate_2`, `candidate_3`, ... if it is taken
    pub fn claim(&mut self, candidate: String) -> String {
        if self.taken.insert(candidate.clone()) {
            return candidate;
        }
        let mut n = 2;
        loop {
            let next = format!("{candidate}_{n}");
            if self.taken.insert(next.clone()) {
                return next;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("New York"), "New_York");
        assert_eq!(sanitize("a-b.c"), "a_b_c");
        assert_eq!(sanitize("-1"), "_1");
        assert_eq!(sanitize(""), "blank");
    }

    #[test]
    fn test_claim_deduplicates() {
        let mut namer = OutputNamer::new(["id"]);
        assert_eq!(namer.claim("x_lev_a".to_string()), "x_lev_a");
        assert_eq!(namer.claim("x_lev_a".to_string()), "x_lev_a_2");
        assert_eq!(namer.claim("x_lev_a".to_string()), "x_lev_a_3");
        assert_eq!(namer.claim("id".to_string()), "id_2");
    }
}
