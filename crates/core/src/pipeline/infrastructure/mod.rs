pub mod live_pipeline;
