//! Core engine for mdis: scan markdown for remote image links, download
//! them with retry/skip/atomic-write safeguards, and rewrite the links to a
//! server-path prefix. The cli crate is a thin wrapper over [`sync`].

pub mod config;
pub mod logging;

pub mod download;
pub mod extract;
pub mod filename;
pub mod probe;
pub mod retry;
pub mod rewrite;
pub mod sync;
