pub mod files;
pub mod kv;
pub mod records;

pub use files::{ensure_data_dir, init_local_data_dir, log_file};
pub use kv::{FileStore, KeyValueStore};
pub use records::{save_record, PersistedState, DARK_MODE_KEY, TASKS_KEY, TIMER_KEY};

#[cfg(test)]
pub use kv::MemoryStore;
#[cfg(test)]
pub use records::load_record;
