//! HTTP handlers

pub mod health;
pub mod model_info;
pub mod metrics;
pub mod predict;

#[cfg(test)]
mod tests;
