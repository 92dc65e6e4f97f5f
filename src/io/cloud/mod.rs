//! Object store abstractions.
//!
//! The job talks to its object store through the [`ObjectIO`] trait, which comes with:
//!
//! - **Synchronous interface** - operations block, wrapping async clients internally
//! - **Fake implementation** - [`FakeObjectIO`] keeps buckets in memory and can inject
//!   failures, for tests that never touch the network
//! - **S3 implementation** - [`S3ObjectIO`] (feature `s3`) backed by `object_store`
//!
//! ## Usage
//!
//! ```
//! use parquetize::io::cloud::*;
//!
//! # fn main() -> CloudResult<()> {
//! let storage = FakeObjectIO::new();
//! storage.put_object("in-bucket", "data.csv", b"a,b\n1,x\n")?;
//! assert_eq!(storage.get_object("in-bucket", "data.csv")?, b"a,b\n1,x\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`CloudResult<T>`] where the error is [`CloudIOError`],
//! categorized by [`ErrorKind`]. The job treats every kind as fatal.

pub mod fake;
#[cfg_attr(docsrs, doc(cfg(feature = "s3")))]
#[cfg(feature = "s3")]
pub mod s3;
pub mod traits;

pub use fake::*;
#[cfg(feature = "s3")]
pub use s3::{S3ObjectIO, S3Settings};
pub use traits::*;
