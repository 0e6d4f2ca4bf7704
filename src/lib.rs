pub mod logger;
pub mod view_pipeline;
