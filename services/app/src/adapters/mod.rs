//! services/app/src/adapters/mod.rs
//!
//! Declares the modules for all external service adapters.

pub mod image_llm;
pub mod recipe_llm;
pub mod storage;
