pub mod alignment_service;
pub mod analytics_service;
pub mod basket_service;
pub mod benchmark_service;
pub mod currency_service;
pub mod plan_service;
pub mod price_service;
pub mod projection_service;
