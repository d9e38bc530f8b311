// src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod util;
pub mod error;

pub mod classify;
pub mod node;
pub mod scan;
pub mod tree_view;
pub mod command;
pub mod session;

pub mod markdown;
pub mod template;
pub mod output;
pub mod editor;

pub mod cli;
