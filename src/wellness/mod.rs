//! Features built on top of [crate::store]. Every view gets its dependencies explicitly through
//! its constructor, see [crate::app::AppContext].

pub mod breathing;
pub mod chart;
pub mod dashboard;
pub mod journal;
pub mod mood;
