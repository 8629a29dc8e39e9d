//! Ingestion: turns files and directories given by the user into tracks
//! ready to be queued.

mod scan;

pub use scan::scan_paths;

#[cfg(test)]
mod tests;
