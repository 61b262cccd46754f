//! Adapter layer: Convert Spotify DTOs to domain models

use super::dto;
use crate::recognition::domain::CatalogMatch;

/// Take the top hit of a search. `None` when the search came back empty.
///
/// No ranking happens here: the catalog's first result is the match.
pub fn to_catalog_match(response: dto::SearchResponse) -> Option<CatalogMatch> {
    response
        .albums
        .items
        .into_iter()
        .next()
        .map(|album| CatalogMatch {
            catalog_album_id: album.id,
            catalog_url: album.external_urls.spotify,
            release_date: album.release_date,
            track_count: album.total_tracks,
        })
}
