//! Terminal front-end: shows the drawn cards and maps keys onto deck operations.

pub mod app;
pub mod controller;
mod ui;
