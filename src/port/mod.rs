//! Trait seams between the engine and its external collaborators.

pub mod outbound;
