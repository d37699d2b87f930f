//! Storage adapters and the storage manager
//!
//! ```text
//! StorageManager ── load/save/remove/clear/size, schema stamping
//!        │
//!        ▼
//! dyn StorageAdapter ── get/set/remove/clear/get_size
//!        ├─ MemoryAdapter  (in process)
//!        ├─ LocalAdapter   (device: <dir>/<key>.json)
//!        └─ CloudAdapter   (remote: <root>/users/<uid>/document.json)
//! ```

pub mod adapter;
pub mod cloud;
pub mod local;
pub mod manager;
pub mod memory;

pub use adapter::StorageAdapter;
pub use cloud::CloudAdapter;
pub use local::LocalAdapter;
pub use manager::{migrate, StorageManager, DEFAULT_DOCUMENT_KEY};
pub use memory::MemoryAdapter;
