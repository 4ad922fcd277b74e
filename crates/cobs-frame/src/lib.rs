#![no_std]
//! Consistent Overhead Byte Stuffing for zero-delimited frames.
//!
//! Transforms arbitrary byte sequences into sequences that contain no
//! `0x00` byte, so a stream can be split into messages on zero
//! delimiters. Overhead is at most one byte per 254 bytes of payload
//! plus one leading byte, independent of payload content.
//!
//! Neither direction appends the frame-terminating zero; attaching and
//! stripping the delimiter is the caller's framing responsibility.
//! Both directions write into caller-owned buffers and never write
//! past the given capacity.

mod decode;
mod encode;
mod error;

pub use decode::decode;
pub use encode::encode;
pub use error::FrameError;

/// Longest run of literal bytes one count byte can cover.
pub const MAX_RUN: usize = 254;

/// Worst-case encoded size for a payload of `len` bytes.
///
/// Size a destination buffer with this to make [`encode`] infallible.
pub const fn max_encoded_len(len: usize) -> usize {
    len + len / MAX_RUN + 1
}
