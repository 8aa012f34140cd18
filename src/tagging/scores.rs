use std::collections::HashMap;

use crate::database::Tag;
use crate::domain::{TagScore, TagState};

/// Nets upvotes against downvotes per tag name across all users, and marks
/// each tag with the requester's own vote state. Output is sorted by score
/// descending, then tag name ascending.
pub fn tag_scores(rows: &[Tag], requester_username: &str, movie_id: i64) -> Vec<TagScore> {
    let requester = requester_username.to_lowercase();

    let mut totals: HashMap<&str, i64> = HashMap::new();
    let mut own_states: HashMap<&str, TagState> = HashMap::new();

    for row in rows {
        let delta = match row.state {
            TagState::Upvote => 1,
            TagState::Downvote => -1,
            // never stored, see TagState
            TagState::NoTag => 0,
        };
        *totals.entry(row.tag_name.as_str()).or_insert(0) += delta;

        if row.username == requester {
            own_states.insert(row.tag_name.as_str(), row.state);
        }
    }

    let mut scores: Vec<TagScore> = totals
        .into_iter()
        .map(|(tag_name, score)| TagScore {
            movie_id,
            tag_name: tag_name.to_string(),
            score,
            requester_state: own_states.get(tag_name).copied().unwrap_or(TagState::NoTag),
        })
        .collect();

    scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.tag_name.cmp(&b.tag_name)));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tag(tag_name: &str, username: &str, state: TagState) -> Tag {
        Tag {
            id: 0,
            movie_id: 7,
            movie_title: "Brick".to_string(),
            tag_name: tag_name.to_string(),
            username: username.to_string(),
            privacy: "public".to_string(),
            state,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn score_is_upvotes_minus_downvotes() {
        let rows = vec![
            tag("Funny", "a", TagState::Upvote),
            tag("Funny", "b", TagState::Upvote),
            tag("Funny", "c", TagState::Upvote),
            tag("Funny", "d", TagState::Downvote),
        ];

        let scores = tag_scores(&rows, "d", 7);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].tag_name, "Funny");
        assert_eq!(scores[0].score, 2);
        assert_eq!(scores[0].requester_state, TagState::Downvote);
    }

    #[test]
    fn scores_sort_descending_then_by_name() {
        let rows = vec![
            tag("quiet", "a", TagState::Upvote),
            tag("loud", "b", TagState::Upvote),
            tag("artsy", "c", TagState::Upvote),
            tag("artsy", "d", TagState::Upvote),
        ];

        let names: Vec<String> = tag_scores(&rows, "nobody", 7)
            .into_iter()
            .map(|s| s.tag_name)
            .collect();

        assert_eq!(names, vec!["artsy", "loud", "quiet"]);
    }

    #[test]
    fn requester_name_is_matched_case_insensitively() {
        // tag rows store lower-cased usernames
        let rows = vec![tag("Funny", "carol", TagState::Upvote)];

        let scores = tag_scores(&rows, "Carol", 7);
        assert_eq!(scores[0].requester_state, TagState::Upvote);
    }

    #[test]
    fn requester_without_a_row_sees_no_tag_state() {
        let rows = vec![tag("Funny", "a", TagState::Upvote)];

        let scores = tag_scores(&rows, "stranger", 7);
        assert_eq!(scores[0].requester_state, TagState::NoTag);
    }

    #[test]
    fn no_rows_yield_no_scores() {
        assert!(tag_scores(&[], "anyone", 7).is_empty());
    }
}
