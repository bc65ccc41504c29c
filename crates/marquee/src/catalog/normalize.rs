//! Raw payload to [`Movie`] normalization

use chrono::{DateTime, Datelike, NaiveDate};

use super::model::{Category, Movie, PaginatedResult, RawMovie, RawMovieDetail, RawMoviePage};

/// Upper bound on reported list pages; the remote refuses pages past it
pub const MAX_TOTAL_PAGES: u32 = 500;

pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=No+Poster";
pub const BACKDROP_PLACEHOLDER: &str = "https://via.placeholder.com/1920x1080?text=No+Backdrop";

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

const DEFAULT_GENRE: &str = "Drama";
const ADULT_RATING: &str = "18+";
const GENERAL_RATING: &str = "PG-13";
const QUALITY: &str = "HD";

/// Percentage score from a 0-10 vote average
pub fn match_score(vote_average: f64) -> u8 {
    if vote_average.is_nan() {
        return 0;
    }
    (vote_average * 10.0).round().clamp(0.0, 100.0) as u8
}

/// Calendar year of a release date, 0 when missing or unparseable
pub fn release_year(date: Option<&str>) -> i32 {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return 0;
    };

    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.year();
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(date) {
        return moment.year();
    }
    // Bare year
    if date.len() == 4 && date.bytes().all(|b| b.is_ascii_digit()) {
        return date.parse().unwrap_or(0);
    }
    0
}

/// Never report more than [`MAX_TOTAL_PAGES`]
pub fn clamp_total_pages(total_pages: u32) -> u32 {
    total_pages.min(MAX_TOTAL_PAGES)
}

fn image_url(base: &str, path: Option<&str>, placeholder: &str) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}{}", base, path),
        None => placeholder.to_string(),
    }
}

/// Maps remote payloads onto the presentation model
#[derive(Debug, Clone)]
pub struct Normalizer {
    image_base_url: String,
    backdrop_base_url: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL, DEFAULT_BACKDROP_BASE_URL)
    }
}

impl Normalizer {
    pub fn new(image_base_url: impl Into<String>, backdrop_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
            backdrop_base_url: backdrop_base_url.into(),
        }
    }

    pub fn movie(&self, raw: &RawMovie) -> Movie {
        Movie {
            id: raw.id.to_string(),
            title: raw.title.clone(),
            description: raw.overview.clone(),
            year: release_year(raw.release_date.as_deref()),
            rating: if raw.adult { ADULT_RATING } else { GENERAL_RATING }.to_string(),
            match_score: match_score(raw.vote_average),
            quality: QUALITY.to_string(),
            poster_url: image_url(
                &self.image_base_url,
                raw.poster_path.as_deref(),
                POSTER_PLACEHOLDER,
            ),
            backdrop_url: image_url(
                &self.backdrop_base_url,
                raw.backdrop_path.as_deref(),
                BACKDROP_PLACEHOLDER,
            ),
            genre: DEFAULT_GENRE.to_string(),
            cast: Vec::new(),
            category: Category::Trending,
        }
    }

    /// Like [`Normalizer::movie`], taking the genre from the detail payload
    pub fn detail(&self, raw: &RawMovieDetail) -> Movie {
        let mut movie = self.movie(&raw.movie);
        if let Some(genre) = raw.genres.iter().map(|g| g.name.trim()).find(|n| !n.is_empty()) {
            movie.genre = genre.to_string();
        }
        movie
    }

    pub fn page(&self, raw: &RawMoviePage) -> PaginatedResult {
        PaginatedResult {
            results: raw.results.iter().map(|m| self.movie(m)).collect(),
            total_pages: clamp_total_pages(raw.total_pages),
        }
    }
}
