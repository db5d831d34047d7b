//! Collection records as served by `/public/collection/v1`.

use serde::{Deserialize, Serialize};

/// Sort key used when an artwork carries no artist name at all.
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// A curatorial department.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Department {
    /// Department identifier used by the `departmentId` search filter.
    #[serde(rename = "departmentId")]
    pub id: i64,

    /// Human-readable department name.
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Body of `GET /departments`.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentsResponse {
    pub departments: Vec<Department>,
}

/// Body of `GET /search`.
///
/// The API sends `"objectIDs": null` when nothing matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    pub total: i64,

    #[serde(rename = "objectIDs", default)]
    pub object_ids: Option<Vec<i64>>,
}

impl SearchResponse {
    /// Matching object ids, empty when the API returned none.
    pub fn ids(&self) -> &[i64] {
        self.object_ids.as_deref().unwrap_or_default()
    }

    /// Consume the response into its id list.
    pub fn into_ids(self) -> Vec<i64> {
        self.object_ids.unwrap_or_default()
    }
}

/// Subject keyword attached to an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub term: String,

    #[serde(rename = "AAT_URL", default)]
    pub aat_url: Option<String>,

    #[serde(rename = "Wikidata_URL", default)]
    pub wikidata_url: Option<String>,
}

/// Snapshot of one object record.
///
/// Every field except the id is optional; the API omits or nulls whatever
/// the catalogue does not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDetail {
    #[serde(rename = "objectID")]
    pub object_id: i64,

    pub is_highlight: Option<bool>,

    /// Full-resolution image URL.
    pub primary_image: Option<String>,
    /// Web-sized image URL.
    pub primary_image_small: Option<String>,

    pub title: Option<String>,

    // Artist
    pub artist_display_name: Option<String>,
    pub artist_alpha_sort: Option<String>,
    pub artist_nationality: Option<String>,
    pub artist_begin_date: Option<String>,
    pub artist_end_date: Option<String>,

    // Object
    pub object_date: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub credit_line: Option<String>,
    pub classification: Option<String>,

    // Geography
    pub geography_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub locale: Option<String>,
    pub locus: Option<String>,
    pub excavation: Option<String>,
    pub river: Option<String>,

    // Rights and provenance
    pub rights_and_reproduction: Option<String>,
    pub link_resource: Option<String>,
    pub metadata_date: Option<String>,
    pub repository: Option<String>,

    #[serde(rename = "objectURL")]
    pub object_url: Option<String>,

    pub tags: Option<Vec<Tag>>,

    #[serde(rename = "objectWikidata_URL")]
    pub object_wikidata_url: Option<String>,

    pub is_timeline_work: Option<bool>,

    #[serde(rename = "GalleryNumber")]
    pub gallery_number: Option<String>,
}

impl ArtworkDetail {
    /// Key used to order hydrated search results.
    ///
    /// Alpha-sort name, then display name, then [`UNKNOWN_ARTIST`]. Only a
    /// missing field falls through; an empty string is a valid key.
    pub fn sort_key(&self) -> &str {
        self.artist_alpha_sort
            .as_deref()
            .or(self.artist_display_name.as_deref())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    /// Image for list rows: small rendition first.
    pub fn image_url(&self) -> Option<&str> {
        non_blank(&self.primary_image_small).or_else(|| non_blank(&self.primary_image))
    }

    /// Image for the detail view: full rendition first.
    pub fn high_res_image_url(&self) -> Option<&str> {
        non_blank(&self.primary_image).or_else(|| non_blank(&self.primary_image_small))
    }

    /// Artist life dates as `begin–end`, if either is known.
    pub fn artist_lifespan(&self) -> Option<String> {
        match (
            non_blank(&self.artist_begin_date),
            non_blank(&self.artist_end_date),
        ) {
            (None, None) => None,
            (begin, end) => Some(format!("{}–{}", begin.unwrap_or("?"), end.unwrap_or("?"))),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
