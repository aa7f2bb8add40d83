//! Conversion from GitHub API types to source records.

use crate::source::RawStar;

use super::types::StarredRepoResponse;

/// Convert a starred-repository entry into a [`RawStar`].
pub fn to_raw_star(star: StarredRepoResponse) -> RawStar {
    let repo = star.repo;

    RawStar {
        id: repo.id,
        name: repo.name,
        description: repo.description,
        html_url: repo.html_url,
        topics: repo.topics,
        language: repo.language,
        starred_at: star.starred_at,
    }
}
