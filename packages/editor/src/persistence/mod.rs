//! Page storage and debounced saving.

mod client;
mod http;
mod memory;
mod store;
mod task;

pub use client::{RetryPolicy, SaveClient, SaveConfig, SaveStatus, DEFAULT_SAVED_FLASH, DEFAULT_SAVE_DEBOUNCE};
pub use http::HttpPageStore;
pub use memory::{MemoryPageStore, StoreCall};
pub use store::{PageStore, StoreError, StoreResult};
pub use task::DelayedTask;
