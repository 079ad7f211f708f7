pub mod api;
pub mod posts;
