//! Core contracts for locker: the persistence and cipher boundaries, the stored
//! envelope format, and the `SecureStore` façade tying them together.
//! Concrete adapters live in `locker-storage`.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod key;
pub mod kv;
pub mod secure_store;

pub use envelope::{Envelope, Strategy};
pub use error::LockerError;
pub use key::KeyMaterial;
pub use secure_store::SecureStore;
