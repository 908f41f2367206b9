pub mod analytics;
pub mod asset;
pub mod chart;
pub mod currency;
pub mod plan;
pub mod price;
pub mod projection;
pub mod settings;
