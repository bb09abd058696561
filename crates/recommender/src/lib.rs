//! Recommender crate for the movie recommendation demo.
//!
//! Ties the similarity store to the metadata client: a selected title goes
//! in, a `RecommendationPage` with the selected movie, up to 8 similar
//! movies and any user-visible notices comes out.

pub mod page;
pub mod recommender;

pub use page::{Notice, Recommendation, RecommendationPage, SelectedMovie};
pub use recommender::{RECOMMENDATION_COUNT, Recommender};
