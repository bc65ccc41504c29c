//! Remote payloads and the normalized movie model

use serde::{Deserialize, Serialize};

/// One movie as listed by the remote catalog
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RawMovie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub adult: bool,
    pub genre_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RawGenre {
    pub id: u64,
    pub name: String,
}

/// Single-movie detail payload
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RawMovieDetail {
    #[serde(flatten)]
    pub movie: RawMovie,
    pub tagline: Option<String>,
    pub runtime: Option<u32>,
    pub status: String,
    pub genres: Vec<RawGenre>,
}

/// Paginated list payload
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RawMoviePage {
    pub page: u32,
    pub results: Vec<RawMovie>,
    pub total_pages: u32,
    pub total_results: u64,
}

/// Shelf a movie is shown on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Trending,
    New,
    MyList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub role: String,
    pub image_url: String,
}

/// Normalized movie rendered by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Release year, 0 when unknown
    pub year: i32,
    pub rating: String,
    /// 0 to 100
    pub match_score: u8,
    pub quality: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub genre: String,
    pub cast: Vec<CastMember>,
    pub category: Category,
}

/// One page of normalized movies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaginatedResult {
    pub results: Vec<Movie>,
    pub total_pages: u32,
}

impl PaginatedResult {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_payload_with_nulls() {
        let json = r#"{
            "page": 1,
            "results": [{
                "id": 550,
                "title": "Fight Club",
                "overview": "An insomniac office worker...",
                "poster_path": null,
                "backdrop_path": "/b.jpg",
                "release_date": "1999-10-15",
                "vote_average": 8.4,
                "vote_count": 27000,
                "adult": false,
                "genre_ids": [18]
            }],
            "total_pages": 41000,
            "total_results": 820000
        }"#;

        let page: RawMoviePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 550);
        assert!(page.results[0].poster_path.is_none());
        assert_eq!(page.total_pages, 41000);
    }

    #[test]
    fn test_detail_payload_flattens_movie() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "overview": "Cobb steals secrets.",
            "release_date": "2010-07-15",
            "vote_average": 8.3,
            "adult": false,
            "tagline": "Your mind is the scene of the crime.",
            "runtime": 148,
            "status": "Released",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
        }"#;

        let detail: RawMovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.movie.id, 27205);
        assert_eq!(detail.runtime, Some(148));
        assert_eq!(detail.genres[0].name, "Action");
    }

    #[test]
    fn test_missing_fields_default() {
        let movie: RawMovie = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(movie.title, "");
        assert_eq!(movie.vote_average, 0.0);
        assert!(movie.release_date.is_none());
    }

    #[test]
    fn test_category_tags() {
        assert_eq!(serde_json::to_string(&Category::MyList).unwrap(), "\"mylist\"");
        assert_eq!(serde_json::to_string(&Category::Trending).unwrap(), "\"trending\"");
        let parsed: Category = serde_json::from_str("\"mylist\"").unwrap();
        assert_eq!(parsed, Category::MyList);
    }
}
