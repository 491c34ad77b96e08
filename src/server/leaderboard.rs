use crate::protocol::LeaderboardEntry;

/// Order standings by score, highest first. The sort is stable, so equal
/// scores keep registration order.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}
