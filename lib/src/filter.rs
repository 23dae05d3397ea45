use crate::scoring::SeasonScoreTable;
use std::collections::{BTreeSet, HashMap};

/// Zero-point weeks a user may have before being treated as inactive.
pub const DEFAULT_THRESHOLD: usize = 5;

/// Drops users whose season is dominated by zero-point weeks.
///
/// Only explicit zero rows count; weeks with no row at all are ignored. A
/// user with exactly `threshold` zero weeks is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliabilityFilter {
    threshold: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub table: SeasonScoreTable,
    /// Excluded user ids, ascending.
    pub excluded: Vec<String>,
}

impl Default for ReliabilityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ReliabilityFilter {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn zero_weeks(table: &SeasonScoreTable) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for row in table.iter() {
            let count = counts.entry(row.user_id.as_str()).or_insert(0);
            if row.points == 0.0 {
                *count += 1;
            }
        }
        counts
    }

    pub fn apply(&self, table: SeasonScoreTable) -> FilterOutcome {
        let excluded: BTreeSet<String> = Self::zero_weeks(&table)
            .into_iter()
            .filter(|&(_, zeros)| zeros > self.threshold)
            .map(|(user_id, _)| user_id.to_string())
            .collect();

        for user_id in &excluded {
            log::info!(
                "Excluding {} for more than {} zero-point weeks",
                user_id,
                self.threshold
            );
        }

        let table = table.retain(|row| !excluded.contains(&row.user_id));
        FilterOutcome {
            table,
            excluded: excluded.into_iter().collect(),
        }
    }
}

pub fn filter(table: SeasonScoreTable, threshold: usize) -> SeasonScoreTable {
    ReliabilityFilter::new(threshold).apply(table).table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::WeeklyScoreRow;

    fn season(user_id: &str, weekly: &[f64]) -> Vec<WeeklyScoreRow> {
        weekly
            .iter()
            .enumerate()
            .map(|(i, &points)| WeeklyScoreRow::new(user_id, i as u32 + 1, points))
            .collect()
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut rows = season("kept", &[0.0, 0.0, 0.0, 0.0, 0.0, 90.0]);
        rows.extend(season("dropped", &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 90.0]));
        let table = SeasonScoreTable::new(rows);

        let outcome = ReliabilityFilter::default().apply(table);

        assert_eq!(outcome.excluded, vec!["dropped".to_string()]);
        assert_eq!(outcome.table.len(), 6);
        assert!(outcome.table.iter().all(|row| row.user_id == "kept"));
    }

    #[test]
    fn absent_weeks_are_not_zero_weeks() {
        // Two zero rows out of a long season; the rest were never played.
        let rows = vec![
            WeeklyScoreRow::new("a", 1, 0.0),
            WeeklyScoreRow::new("a", 9, 0.0),
            WeeklyScoreRow::new("a", 14, 101.5),
        ];
        let table = SeasonScoreTable::new(rows.clone());

        let counts = ReliabilityFilter::zero_weeks(&table);
        assert_eq!(counts.get("a"), Some(&2));

        let filtered = filter(table, 1);
        assert!(filtered.is_empty());

        let kept = filter(SeasonScoreTable::new(rows.clone()), 2);
        assert_eq!(kept.to_vec(), rows);
    }

    #[test]
    fn preserves_row_order() {
        let rows = vec![
            WeeklyScoreRow::new("b", 1, 10.0),
            WeeklyScoreRow::new("z", 1, 0.0),
            WeeklyScoreRow::new("a", 1, 12.0),
            WeeklyScoreRow::new("z", 2, 0.0),
            WeeklyScoreRow::new("b", 2, 0.0),
            WeeklyScoreRow::new("a", 2, 8.0),
        ];

        let filtered = filter(SeasonScoreTable::new(rows), 1);

        let order: Vec<(&str, u32)> = filtered
            .iter()
            .map(|row| (row.user_id.as_str(), row.week))
            .collect();
        assert_eq!(order, vec![("b", 1), ("a", 1), ("b", 2), ("a", 2)]);
    }

    #[test]
    fn zero_threshold_excludes_any_zero_week() {
        let table = SeasonScoreTable::new(vec![
            WeeklyScoreRow::new("a", 1, 0.0),
            WeeklyScoreRow::new("b", 1, 0.5),
        ]);

        let outcome = ReliabilityFilter::new(0).apply(table);

        assert_eq!(outcome.excluded, vec!["a".to_string()]);
        assert_eq!(outcome.table.to_vec(), vec![WeeklyScoreRow::new("b", 1, 0.5)]);
    }
}
