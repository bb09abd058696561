//! Terminal rendering of a recommendation page.
//!
//! Layout follows the web page the demo started as: a panel for the
//! selected movie, then the recommendation cards, then any notices and the
//! TMDb attribution.

use std::fmt::Write;

use colored::Colorize;
use data_loader::MovieRecord;
use recommender::{Recommendation, RecommendationPage, SelectedMovie};

/// Cards per grid row
const GRID_COLUMNS: usize = 4;

pub const ATTRIBUTION: &str = "Data provided by The Movie Database (TMDb): https://www.themoviedb.org";

/// Render a page to a string ready for stdout
pub fn render_page(page: &RecommendationPage) -> String {
    let mut out = String::new();

    // Writing to a String can't fail
    let _ = writeln!(out, "{}", "Movie Recommender System".bold().blue());
    let _ = writeln!(out);

    if let Some(selected) = &page.selected {
        render_selected(&mut out, selected);
    }

    if page.recommendations.is_empty() {
        let _ = writeln!(out, "{}", "No recommendations found.".yellow());
    } else {
        let _ = writeln!(out, "{}", "Recommended Movies".bold());
        for (row, cards) in page.recommendations.chunks(GRID_COLUMNS).enumerate() {
            let _ = writeln!(out);
            for (col, rec) in cards.iter().enumerate() {
                render_card(&mut out, row * GRID_COLUMNS + col + 1, rec);
            }
        }
    }

    if !page.notices.is_empty() {
        let _ = writeln!(out);
        for notice in &page.notices {
            let _ = writeln!(out, "{} {}", "error:".red().bold(), notice);
        }
    }

    let _ = writeln!(out, "\n---\n{}", ATTRIBUTION.dimmed());
    out
}

/// Render the title listing for `search`, showing at most `limit` entries
pub fn render_search(matches: &[&MovieRecord], query: &str, limit: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        format!("{} titles matching '{}':", matches.len(), query).bold().blue()
    );
    for record in matches.iter().take(limit) {
        let _ = writeln!(out, "{}  {}", format!("{:>7}", record.movie_id).dimmed(), record.title);
    }
    if matches.len() > limit {
        let _ = writeln!(out, "... and {} more", matches.len() - limit);
    }
    out
}

fn render_selected(out: &mut String, selected: &SelectedMovie) {
    let _ = writeln!(out, "{} {}", "Selected Movie:".bold(), selected.title.green().bold());

    let Some(details) = &selected.details else {
        let _ = writeln!(out);
        return;
    };

    if let Some(link) = details.imdb_url() {
        let _ = writeln!(out, "{}IMDb: {}", "• ".green(), link);
    }
    if let Some(poster) = &details.poster_url {
        let _ = writeln!(out, "{}Poster: {}", "• ".green(), poster);
    }
    let _ = writeln!(
        out,
        "{}Release Year: {}",
        "• ".green(),
        details.release_year.as_deref().unwrap_or("unknown")
    );
    let _ = writeln!(out, "{}Genres: {}", "• ".green(), details.genres_label());
    let _ = writeln!(out);
}

fn render_card(out: &mut String, rank: usize, rec: &Recommendation) {
    let year = rec.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    let _ = writeln!(out, "{}. {}{}", rank.to_string().green(), rec.title.bold(), year);

    if let Some(link) = rec.imdb_url() {
        let _ = writeln!(out, "   {}", link.cyan());
    }
    if let Some(poster) = rec.poster_url() {
        let _ = writeln!(out, "   Poster: {}", poster);
    }
    let _ = writeln!(out, "   Genres: {}", rec.genres_label());
}
