//! Interactive terminal front end for page analysis.
//!
//! Plain input lines are collected as keywords; slash commands set the target
//! URL and start an analysis. Analyses run on background tasks so the screen
//! keeps redrawing while a page loads.

mod command;
mod feeders;
mod state;
mod styles;
mod transcript;
mod tui;
mod view;

pub use tui::run;
