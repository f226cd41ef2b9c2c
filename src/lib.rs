//! Terminal companion for mental well-being: mood tracking, a journal with gentle reflections,
//! a breathing guide and affirmations. Everything is kept in a local application directory; the
//! only remote dependency is the text generation API used for reflections and affirmations.
//!

pub mod app;
pub mod cli;
pub mod companion;
pub mod store;
pub mod utils;
pub mod wellness;
