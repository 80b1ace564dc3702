pub mod batch_job;
pub mod record;

// Re-export core models for easy access
pub use batch_job::BatchJob;
pub use record::Record;
