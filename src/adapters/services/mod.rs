//! External service adapters

pub mod asr;
