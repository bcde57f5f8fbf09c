use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::host::Host;

/// Ranks hosts against a search query.
pub struct HostFilter {
    matcher: SkimMatcherV2,
}

impl Default for HostFilter {
    fn default() -> Self {
        Self {
            matcher: SkimMatcherV2::default().smart_case(),
        }
    }
}

impl std::fmt::Debug for HostFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFilter").finish_non_exhaustive()
    }
}

impl HostFilter {
    /// Indices into `hosts` of every match, best first.
    ///
    /// An empty query returns every index in order. Hosts whose search text
    /// does not contain the query as a subsequence are dropped. Equal scores
    /// keep collection order.
    pub fn apply(&self, hosts: &[Host], query: &str) -> Vec<usize> {
        if query.is_empty() {
            return (0..hosts.len()).collect();
        }

        let mut scored: Vec<(usize, i64)> = hosts
            .iter()
            .enumerate()
            .filter_map(|(i, host)| self.score(host, query).map(|s| (i, s)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(i, _)| i).collect()
    }

    /// Fuzzy score of `query` against the host's search text.
    pub fn score(&self, host: &Host, query: &str) -> Option<i64> {
        self.matcher.fuzzy_match(&host.search_text(), query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostSet;
    use crate::ssh_config::parser::parse_content;
    use std::path::Path;

    fn hosts(content: &str) -> Vec<Host> {
        let blocks = parse_content(content, Path::new("/tmp/test_config")).unwrap();
        HostSet::from_blocks(blocks).hosts().to_vec()
    }

    fn sample() -> Vec<Host> {
        hosts(
            "\
Host web1
  HostName 10.0.0.5
  User deploy
Host db1
  HostName 10.0.0.9
  User postgres
Host bastion
  HostName jump.example.com
  Port 2222
",
        )
    }

    fn names(all: &[Host], indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| all[i].name.clone()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let all = sample();
        let filter = HostFilter::default();
        assert_eq!(filter.apply(&all, ""), vec![0, 1, 2]);
        assert!(filter.apply(&[], "").is_empty());
    }

    #[test]
    fn test_db_query_ranks_db1_and_drops_non_matches() {
        let all = sample();
        let filter = HostFilter::default();
        let result = filter.apply(&all, "db");
        assert_eq!(result.first().map(|&i| all[i].name.as_str()), Some("db1"));
        // web1's only 'b' comes before its only 'd'
        assert!(!names(&all, &result).contains(&"web1".to_string()));
    }

    #[test]
    fn test_every_result_matches() {
        let all = sample();
        let filter = HostFilter::default();
        for query in ["1", "10", "jmp", "2222", "pg", "e", "zzz"] {
            let result = filter.apply(&all, query);
            for &i in &result {
                assert!(filter.score(&all[i], query).is_some(), "{} should match {}", all[i].name, query);
            }
            for (i, host) in all.iter().enumerate() {
                if !result.contains(&i) {
                    assert!(filter.score(host, query).is_none());
                }
            }
        }
    }

    #[test]
    fn test_no_match_is_empty() {
        let all = sample();
        assert!(HostFilter::default().apply(&all, "qqq").is_empty());
    }

    #[test]
    fn test_matches_other_columns() {
        let all = sample();
        let filter = HostFilter::default();
        assert_eq!(names(&all, &filter.apply(&all, "2222")), vec!["bastion"]);
        assert_eq!(names(&all, &filter.apply(&all, "postgres")), vec!["db1"]);
        assert_eq!(names(&all, &filter.apply(&all, "jump.example")), vec!["bastion"]);
    }

    #[test]
    fn test_aliases_are_searchable() {
        let all = hosts("Host web1\n  HostName 10.0.0.5\nHost frontend\n  HostName 10.0.0.5\nHost other\n");
        let filter = HostFilter::default();
        assert_eq!(names(&all, &filter.apply(&all, "frontend")), vec!["web1"]);
    }

    #[test]
    fn test_equal_scores_keep_collection_order() {
        let all = hosts("Host node-a\nHost node-b\nHost node-c\n");
        let filter = HostFilter::default();
        assert_eq!(filter.apply(&all, "node"), vec![0, 1, 2]);
    }

    #[test]
    fn test_smart_case() {
        let all = hosts("Host Prod\nHost staging\n");
        let filter = HostFilter::default();
        assert_eq!(names(&all, &filter.apply(&all, "prod")), vec!["Prod"]);
        assert!(filter.apply(&all, "PROD").is_empty());
    }
}
