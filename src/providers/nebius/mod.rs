pub mod nebius;

pub use nebius::NebiusProvider;
