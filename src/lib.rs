//! Employee Attrition Risk - Core Inference & Explanation Pipeline

pub mod api;
pub mod constants;
pub mod logic;
