//! Storyline Engine — an interpreter for branching, choice-driven stories.
//!
//! Walks a graph of chapters and endings, tracks a single bounded numeric
//! attribute ("pad") that choices adjust, and resolves which variant of a
//! chapter's dialogue to show by evaluating small range predicates against
//! that attribute. Story content is hand-authored TOML; malformed content
//! is corrected or degraded, never fatal to a running session.

pub mod core;
pub mod schema;
