/// Use mimalloc as the global allocator.
/// Faster than glibc malloc for the small transient allocations the
/// codec's reusable buffers go through on startup, and keeps the binary
/// self-contained across platforms.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod base64;
pub mod common;
pub mod error;
