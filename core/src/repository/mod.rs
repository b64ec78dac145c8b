pub mod file;
pub mod traits;

// Re-export
pub use file::FileStoreRepository;
pub use traits::StoreRepository;
