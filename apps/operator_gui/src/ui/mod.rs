//! UI layer: app shell and chart rendering.

pub mod app;
pub mod chart_view;
