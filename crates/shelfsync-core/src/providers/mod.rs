// Provider implementations for catalog sources
pub mod remote;

pub use remote::RemoteCatalog;
