//! The heuristic outline scanner: line patterns, block-stack machine,
//! content-hash memoization, and the workspace walker.

pub mod cache;
pub mod frame;
pub mod patterns;
pub mod scanner;
pub mod workspace;

pub use cache::scan_cached;
pub use scanner::scan;
