pub mod backend;
pub mod recovery;
pub mod scheduler;
