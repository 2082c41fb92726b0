use chrono::NaiveDate;

use crate::tmdb::{DetailBundle, MovieSummary};

/// Home rails show the first five movies of each list.
pub const HOME_RAIL_CAP: usize = 5;
/// The detail screen shows at most fifteen cast members.
pub const CAST_DISPLAY_CAP: usize = 15;
/// Only the first video is surfaced, as the primary trailer.
pub const TRAILER_DISPLAY_CAP: usize = 1;

/// `2021-03-15` -> `15 Mar, 2021`. Unparseable or missing dates fall back
/// to the raw input so a card never renders blank.
pub fn format_release_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%-d %b, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Card/list poster URL. The template keeps its own trailing slash, so a
/// leading-slash TMDB path produces a double slash, matching the CDN
/// template the app has always used.
pub fn poster_url(image_base: &str, path: &str) -> String {
    format!("{image_base}/w185/{path}")
}

/// Detail backdrop URL; the wide template concatenates the path directly.
pub fn backdrop_url(image_base: &str, path: &str) -> String {
    format!("{image_base}/w780{path}")
}

pub fn trailer_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={key}")
}

/// First `HOME_RAIL_CAP` movies of a fetched list.
pub fn home_rail(movies: &[MovieSummary]) -> &[MovieSummary] {
    &movies[..movies.len().min(HOME_RAIL_CAP)]
}

/// What a movie card displays.
#[derive(Debug, Clone)]
pub struct MovieCard {
    pub id: i32,
    pub title: String,
    pub release_date: String,
    pub poster: Option<String>,
    pub rating: f32,
}

pub fn movie_card(movie: &MovieSummary, image_base: &str) -> MovieCard {
    MovieCard {
        id: movie.id,
        title: movie.title.clone(),
        release_date: movie
            .release_date
            .as_deref()
            .map(format_release_date)
            .unwrap_or_default(),
        poster: movie
            .poster_path
            .as_deref()
            .map(|p| poster_url(image_base, p)),
        rating: movie.vote_average,
    }
}

#[derive(Debug, Clone)]
pub struct CastEntry {
    pub name: String,
    pub character: String,
    pub profile: Option<String>,
}

/// Fully composed detail screen: catalog data plus the bookmark toggle.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub id: i32,
    pub title: String,
    pub release_date: String,
    pub runtime: Option<u32>,
    pub rating: f32,
    pub genres: Vec<String>,
    pub overview: String,
    pub cast: Vec<CastEntry>,
    pub trailer: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub bookmarked: bool,
}

pub fn detail_view(bundle: &DetailBundle, bookmarked: bool, image_base: &str) -> DetailView {
    let detail = &bundle.detail;
    DetailView {
        id: detail.id,
        title: detail.title.clone(),
        release_date: detail
            .release_date
            .as_deref()
            .map(format_release_date)
            .unwrap_or_default(),
        runtime: detail.runtime,
        rating: detail.vote_average,
        genres: detail.genres.iter().map(|g| g.name.clone()).collect(),
        overview: detail.overview.clone(),
        cast: bundle
            .credits
            .cast
            .iter()
            .take(CAST_DISPLAY_CAP)
            .map(|c| CastEntry {
                name: c.name.clone(),
                character: c.character.clone(),
                profile: c.profile_path.as_deref().map(|p| poster_url(image_base, p)),
            })
            .collect(),
        trailer: bundle
            .videos
            .results
            .iter()
            .take(TRAILER_DISPLAY_CAP)
            .map(|v| trailer_url(&v.key))
            .next(),
        poster: detail
            .poster_path
            .as_deref()
            .map(|p| poster_url(image_base, p)),
        backdrop: detail
            .backdrop_path
            .as_deref()
            .map(|p| backdrop_url(image_base, p)),
        bookmarked,
    }
}

pub fn render_card(card: &MovieCard) -> String {
    let mut out = format!("{}\n    {}  \u{2605} {:.1}", card.title, card.release_date, card.rating);
    if let Some(poster) = &card.poster {
        out.push_str(&format!("\n    {poster}"));
    }
    out
}

pub fn render_rail(heading: &str, movies: &[MovieSummary], image_base: &str) -> String {
    let mut out = format!("== {heading} ==\n");
    for movie in home_rail(movies) {
        out.push_str(&render_card(&movie_card(movie, image_base)));
        out.push('\n');
    }
    out
}

pub fn render_detail(view: &DetailView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", view.title));
    if let Some(runtime) = view.runtime {
        out.push_str(&format!("{runtime}min  "));
    }
    out.push_str(&format!("\u{2605} {:.1}", view.rating));
    if view.bookmarked {
        out.push_str("  [bookmarked]");
    }
    out.push('\n');
    if !view.release_date.is_empty() {
        out.push_str(&format!("Released {}\n", view.release_date));
    }
    if !view.genres.is_empty() {
        out.push_str(&format!("Genres: {}\n", view.genres.join(", ")));
    }
    if let Some(trailer) = &view.trailer {
        out.push_str(&format!("Trailer: {trailer}\n"));
    }
    if !view.overview.is_empty() {
        out.push_str(&format!("\nSynopsis\n{}\n", view.overview));
    }
    if !view.cast.is_empty() {
        out.push_str("\nCast\n");
        for entry in &view.cast {
            if entry.character.is_empty() {
                out.push_str(&format!("  {}\n", entry.name));
            } else {
                out.push_str(&format!("  {} as {}\n", entry.name, entry.character));
            }
        }
    }
    out
}
