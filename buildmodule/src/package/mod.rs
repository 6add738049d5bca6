//! [`Package`](crate::label::Package) implementations.

mod memory;
mod oci;

pub use memory::MemoryPackage;
pub use oci::OciLayoutPackage;
