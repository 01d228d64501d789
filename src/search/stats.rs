use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Search statistics accumulated over a whole game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes visited per depth from the root (root = 1).
    pub evaluations_per_depth: FxHashMap<u32, u64>,
    /// Seconds spent searching, all moves together.
    pub total_seconds: f64,
    /// Nodes whose children were generated.
    pub expanded_nodes: u64,
    /// Children generated by those nodes.
    pub generated_children: u64,
}

impl SearchStats {
    #[inline]
    pub fn record_visit(&mut self, depth: u32) {
        *self.evaluations_per_depth.entry(depth).or_insert(0) += 1;
    }

    #[inline]
    pub fn record_expansion(&mut self, children: usize) {
        self.expanded_nodes += 1;
        self.generated_children += children as u64;
    }

    pub fn total_evaluations(&self) -> u64 {
        self.evaluations_per_depth.values().sum()
    }

    /// `(depth, count)` pairs, shallowest first.
    pub fn depth_counts(&self) -> Vec<(u32, u64)> {
        let mut counts: Vec<(u32, u64)> = self
            .evaluations_per_depth
            .iter()
            .map(|(&depth, &count)| (depth, count))
            .collect();
        counts.sort_unstable_by_key(|&(depth, _)| depth);
        counts
    }

    /// `(depth, percent of all evaluations)` pairs, shallowest first.
    pub fn depth_percentages(&self) -> Vec<(u32, f64)> {
        let total = self.total_evaluations();
        if total == 0 {
            return Vec::new();
        }
        self.depth_counts()
            .into_iter()
            .map(|(depth, count)| (depth, count as f64 * 100.0 / total as f64))
            .collect()
    }

    pub fn average_branching_factor(&self) -> f64 {
        if self.expanded_nodes == 0 {
            0.0
        } else {
            self.generated_children as f64 / self.expanded_nodes as f64
        }
    }

    pub fn summary(&self, score: i32, elapsed: Duration) -> SearchSummary {
        SearchSummary {
            score,
            total_evaluations: self.total_evaluations(),
            depth_percentages: self.depth_percentages(),
            depth_counts: self.depth_counts(),
            branching_factor: self.average_branching_factor(),
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}

/// What gets printed and traced after each computer move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSummary {
    pub score: i32,
    pub total_evaluations: u64,
    pub depth_percentages: Vec<(u32, f64)>,
    pub depth_counts: Vec<(u32, u64)>,
    pub branching_factor: f64,
    pub elapsed_seconds: f64,
}

impl fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Heuristic score: {}", self.score)?;
        writeln!(f, "Cumulative evals: {}", self.total_evaluations)?;
        f.write_str("Cumulative % evals by depth:")?;
        for (depth, percent) in &self.depth_percentages {
            write!(f, " {depth}={percent:.1}%")?;
        }
        writeln!(f)?;
        f.write_str("Cumulative evals per depth:")?;
        for (depth, count) in &self.depth_counts {
            write!(f, " {depth}={count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Average branching factor: {:.1}", self.branching_factor)?;
        write!(f, "Elapsed time: {:.1}s", self.elapsed_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_and_branching() {
        let mut stats = SearchStats::default();
        stats.record_visit(1);
        stats.record_expansion(3);
        for _ in 0..3 {
            stats.record_visit(2);
        }
        assert_eq!(stats.total_evaluations(), 4);
        assert_eq!(stats.depth_counts(), vec![(1, 1), (2, 3)]);
        assert_eq!(stats.depth_percentages(), vec![(1, 25.0), (2, 75.0)]);
        assert_eq!(stats.average_branching_factor(), 3.0);

        let text = stats.summary(-12, Duration::from_millis(400)).to_string();
        assert_eq!(
            text,
            "Heuristic score: -12\n\
             Cumulative evals: 4\n\
             Cumulative % evals by depth: 1=25.0% 2=75.0%\n\
             Cumulative evals per depth: 1=1 2=3\n\
             Average branching factor: 3.0\n\
             Elapsed time: 0.4s"
        );
    }

    #[test]
    fn test_empty_stats() {
        let stats = SearchStats::default();
        assert!(stats.depth_percentages().is_empty());
        assert_eq!(stats.average_branching_factor(), 0.0);
    }
}
