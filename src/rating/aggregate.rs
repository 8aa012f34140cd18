use std::collections::HashMap;

use crate::database::Rating;
use crate::domain::{AggregateRating, CategorySummary};

/// Picks the most rated category name on the movie, then the most used
/// upperbound within that name, and averages exactly the rows of that
/// (name, upperbound) group. Returns None when there are no rows at all.
///
/// Ties are broken deterministically: the lexicographically smaller name,
/// then the numerically smaller upperbound.
pub fn most_popular_rating(rows: &[Rating]) -> Option<AggregateRating> {
    let category_name = most_rated_category(rows)?;
    let upperbound = most_used_upperbound(rows, category_name)?;

    let values: Vec<i64> = rows
        .iter()
        .filter(|r| r.category_name == category_name && r.upperbound == upperbound)
        .map(|r| r.value)
        .collect();

    Some(AggregateRating {
        category_name: category_name.to_string(),
        upperbound,
        average: mean(&values),
    })
}

fn most_rated_category(rows: &[Rating]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.category_name.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name)
}

fn most_used_upperbound(rows: &[Rating], category_name: &str) -> Option<i64> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for row in rows.iter().filter(|r| r.category_name == category_name) {
        *counts.entry(row.upperbound).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(upperbound, _)| upperbound)
}

/// Groups the movie's ratings by (category_name, upperbound) and averages
/// each group. When the requester authored a row in a group, their raw
/// value and username ride along; other groups carry the mean only.
/// Output is sorted by category name, then upperbound.
pub fn category_summaries(rows: &[Rating], requester_username: &str) -> Vec<CategorySummary> {
    let mut groups: HashMap<(&str, i64), Vec<&Rating>> = HashMap::new();
    for row in rows {
        groups
            .entry((row.category_name.as_str(), row.upperbound))
            .or_default()
            .push(row);
    }

    let mut summaries: Vec<CategorySummary> = groups
        .into_values()
        .map(|group| summarize_group(&group, requester_username))
        .collect();

    summaries.sort_by(|a, b| {
        a.category_name
            .cmp(&b.category_name)
            .then(a.upperbound.cmp(&b.upperbound))
    });
    summaries
}

fn summarize_group(group: &[&Rating], requester_username: &str) -> CategorySummary {
    let first = &group[0];
    let values: Vec<i64> = group.iter().map(|r| r.value).collect();
    let own_row = group.iter().find(|r| r.username == requester_username);

    CategorySummary {
        movie_id: first.movie_id,
        category_name: first.category_name.clone(),
        upperbound: first.upperbound,
        subtype: first.subtype.clone(),
        average: mean(&values),
        requester_value: own_row.map(|r| r.value),
        requester_username: own_row.map(|r| r.username.clone()),
    }
}

fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: i64 = values.iter().sum();
    sum as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rating(category: &str, upperbound: i64, value: i64, username: &str) -> Rating {
        Rating {
            id: 0,
            movie_id: 1,
            movie_title: "The Long Goodbye".to_string(),
            category_name: category.to_string(),
            upperbound,
            value,
            username: username.to_string(),
            subtype: "scale".to_string(),
            privacy: "public".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn most_popular_picks_category_then_upperbound_by_count() {
        let rows = vec![
            rating("A", 5, 1, "u1"),
            rating("A", 5, 2, "u2"),
            rating("A", 5, 3, "u3"),
            rating("A", 10, 9, "u4"),
            rating("B", 5, 4, "u5"),
            rating("B", 5, 5, "u6"),
        ];

        let aggregate = most_popular_rating(&rows).unwrap();
        assert_eq!(aggregate.category_name, "A");
        assert_eq!(aggregate.upperbound, 5);
        assert!((aggregate.average - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn most_popular_breaks_category_ties_lexicographically() {
        let rows = vec![
            rating("B", 5, 3, "u1"),
            rating("B", 5, 4, "u2"),
            rating("A", 5, 1, "u3"),
            rating("A", 5, 2, "u4"),
        ];

        let aggregate = most_popular_rating(&rows).unwrap();
        assert_eq!(aggregate.category_name, "A");
    }

    #[test]
    fn most_popular_breaks_upperbound_ties_with_smaller_scale() {
        let rows = vec![
            rating("A", 10, 8, "u1"),
            rating("A", 5, 3, "u2"),
        ];

        let aggregate = most_popular_rating(&rows).unwrap();
        assert_eq!(aggregate.upperbound, 5);
        assert!((aggregate.average - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn most_popular_returns_none_without_ratings() {
        assert!(most_popular_rating(&[]).is_none());
    }

    #[test]
    fn same_name_with_different_upperbound_is_a_distinct_category() {
        let rows = vec![
            rating("Stickiness", 5, 3, "u1"),
            rating("Stickiness", 10, 7, "u2"),
        ];

        let summaries = category_summaries(&rows, "nobody");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].upperbound, 5);
        assert_eq!(summaries[1].upperbound, 10);
    }

    #[test]
    fn summaries_attach_requester_rating_only_where_they_voted() {
        let rows = vec![
            rating("A", 5, 4, "alice"),
            rating("A", 5, 2, "bob"),
            rating("B", 10, 9, "bob"),
        ];

        let summaries = category_summaries(&rows, "alice");
        assert_eq!(summaries.len(), 2);

        let a = &summaries[0];
        assert_eq!(a.category_name, "A");
        assert!((a.average - 3.0).abs() < f64::EPSILON);
        assert_eq!(a.requester_value, Some(4));
        assert_eq!(a.requester_username.as_deref(), Some("alice"));

        let b = &summaries[1];
        assert_eq!(b.category_name, "B");
        assert!((b.average - 9.0).abs() < f64::EPSILON);
        assert_eq!(b.requester_value, None);
        assert_eq!(b.requester_username, None);
    }

    #[test]
    fn summaries_are_sorted_by_name_then_upperbound() {
        let rows = vec![
            rating("B", 5, 1, "u1"),
            rating("A", 10, 2, "u2"),
            rating("A", 5, 3, "u3"),
        ];

        let keys: Vec<(String, i64)> = category_summaries(&rows, "nobody")
            .into_iter()
            .map(|s| (s.category_name, s.upperbound))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("A".to_string(), 5),
                ("A".to_string(), 10),
                ("B".to_string(), 5)
            ]
        );
    }
}
