//! Hardsub - interactive subtitle burn-in workflow
//!
//! Obtains a video (direct URL, rclone remote or local file), lets the user pick
//! an audio track and a subtitle source (internal, translated or downloaded),
//! burns the subtitle and a watermark in with ffmpeg and uploads the result.

pub mod cli;
pub mod command;
pub mod config;
pub mod download;
pub mod error;
pub mod media;
pub mod prompt;
pub mod remote;
pub mod setup;
pub mod subtitle;
pub mod tempfiles;
pub mod translate;
pub mod workflow;

#[cfg(test)]
mod test_server;
