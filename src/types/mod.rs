pub mod anomaly;
pub mod post;
pub mod summary;
pub mod view;
