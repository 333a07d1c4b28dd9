// Adapters layer: concrete implementations of domain ports for external systems.

pub mod openai;
