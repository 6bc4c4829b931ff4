pub mod config;
pub mod logging;

pub mod archive;
pub mod checksum;
pub mod connectivity;
pub mod context;
pub mod fetcher;
pub mod gallery;
pub mod http;
pub mod identifier;
pub mod progress;
pub mod retry;
pub mod storage;
pub mod version;

#[cfg(test)]
mod testing;

pub use context::FetchContext;
pub use identifier::ExtensionRef;
pub use version::VersionSpec;
