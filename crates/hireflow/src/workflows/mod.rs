pub mod interviews;
pub mod jobs;
pub mod pipeline;
pub mod screening;
