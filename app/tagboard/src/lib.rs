//! Tagboard - client engine of a dataset tagging tool.
//!
//! Computes the best-fit tile grid for a folder of images, keeps selection
//! and tags in sync with server notifications, drives the sequential
//! thumbnail queue, and streams job logs over the application feed.
//! The `tagboard` binary exposes each piece as a CLI command.

pub mod board;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod grid;
pub mod schema;
pub mod selection;
pub mod thumbnails;
pub mod utils;
