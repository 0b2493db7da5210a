//! gix-ref-advertise: the ref advertisement encoder that opens the git
//! fetch/push wire protocol.
//!
//! This crate is a standalone extraction of one of the two hardest pieces of
//! a fetch/push session: serializing a set of named object references plus
//! capability tokens into the initial advertisement, including optional
//! peeled-tag lines and synthetic `.have` lines from alternate object
//! sources. Everything around it — object-database storage, packfile I/O,
//! authentication, transport framing below the line encoder — is out of
//! scope and represented purely as the traits in [`resolver`], [`mark`] and
//! [`sink`].
//!
//! # Line format
//!
//! ```text
//! <hex-object-id> SP <ref-name> [NUL SP cap1 SP cap2 ... SP] LF
//! ```
//!
//! The capability section is appended only to the first line ever emitted in
//! a session, and only if at least one capability was registered.
#![deny(missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod advertiser;
mod error;
mod mark;
mod refs;
mod resolver;
mod sink;

pub use advertiser::{Advertiser, HAVE_PSEUDO_REF};
pub use error::{Error, Result};
pub use mark::{AdvertisedMark, HashSetMark};
pub use refs::RefContainer;
pub use resolver::{ObjectResolver, ResolvedObject};
pub use sink::{LineSink, PlainSink};

#[cfg(feature = "blocking-io")]
pub use sink::PacketLineSink;
