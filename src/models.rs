use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub runtime_min: u32,
    #[serde(default)]
    pub overview: String,
}

impl Movie {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: 0,
            genres: Vec::new(),
            poster: String::new(),
            rating: 0.0,
            runtime_min: 0,
            overview: String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    pub name: String,
}

// Listing entries carry `genre_ids`; details fill `genres` and the optional fields.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<TmdbGenre>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_companies: Option<Vec<ProductionCompany>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_countries: Option<Vec<ProductionCountry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// TMDB sends explicit nulls for unknown values; read them as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TmdbMovie {
    pub fn canonical_id(&self) -> String {
        format!("tmdb-{}", self.id)
    }

    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    pub fn to_movie(&self) -> Movie {
        let genres = self
            .genres
            .as_ref()
            .map(|g| g.iter().map(|x| x.name.clone()).collect())
            .unwrap_or_default();
        Movie {
            id: self.canonical_id(),
            title: self.title.clone(),
            year: self.release_year().unwrap_or(0),
            genres,
            poster: crate::tmdb::poster_url(self.poster_path.as_deref()),
            rating: self.vote_average as f32,
            runtime_min: self.runtime.unwrap_or(0),
            overview: self.overview.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TmdbPage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_entry_decodes_without_detail_fields() {
        let value = json!({
            "id": 603,
            "title": "The Matrix",
            "poster_path": null,
            "backdrop_path": "/bd.jpg",
            "overview": "Neo wakes up.",
            "release_date": "1999-03-30",
            "vote_average": 8.2,
            "vote_count": 25000,
            "genre_ids": [28, 878],
            "adult": false,
            "original_language": "en",
            "popularity": 80.5
        });
        let movie: TmdbMovie = serde_json::from_value(value).expect("decode");
        assert_eq!(movie.genre_ids, vec![28, 878]);
        assert!(movie.genres.is_none());
        assert!(movie.runtime.is_none());
        assert_eq!(movie.release_year(), Some(1999));
    }

    #[test]
    fn canonical_mapping_prefixes_id_and_resolves_genres() {
        let value = json!({
            "id": 27205,
            "title": "Inception",
            "poster_path": "/p.jpg",
            "overview": "Dreams.",
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "runtime": 148
        });
        let movie: TmdbMovie = serde_json::from_value(value).expect("decode");
        let canonical = movie.to_movie();
        assert_eq!(canonical.id, "tmdb-27205");
        assert_eq!(canonical.year, 2010);
        assert_eq!(canonical.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(canonical.runtime_min, 148);
        assert_eq!(canonical.poster, "https://image.tmdb.org/t/p/w500/p.jpg");
    }

    #[test]
    fn null_fields_in_one_entry_do_not_fail_the_page() {
        let value = json!({
            "page": 1,
            "results": [
                {"id": 1, "title": "Alien", "overview": "In space.", "release_date": "1979-05-25"},
                {"id": 2, "title": "Aliens", "overview": null, "release_date": null,
                 "original_language": null, "vote_average": null, "genre_ids": null}
            ],
            "total_pages": 1,
            "total_results": 2
        });
        let page: TmdbPage = serde_json::from_value(value).expect("decode");
        assert_eq!(page.results.len(), 2);
        let second = &page.results[1];
        assert_eq!(second.overview, "");
        assert_eq!(second.release_year(), None);
        assert!(second.genre_ids.is_empty());
        assert_eq!(second.to_movie().year, 0);
    }

    #[test]
    fn unknown_release_date_maps_to_year_zero() {
        let movie: TmdbMovie =
            serde_json::from_value(json!({"id": 1, "title": "Untitled", "release_date": ""}))
                .expect("decode");
        assert_eq!(movie.to_movie().year, 0);
    }

    #[test]
    fn movie_serializes_runtime_in_camel_case() {
        let mut movie = Movie::new("tt1", "One");
        movie.runtime_min = 90;
        let value = serde_json::to_value(&movie).expect("encode");
        assert_eq!(value["runtimeMin"], 90);
    }
}
