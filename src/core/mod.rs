pub mod batch;
pub mod config;
pub mod paths;

pub use batch::{PreparedQuery, QuerySource, SequenceBatchBuilder};
pub use config::{load_config, save_config, Config};
