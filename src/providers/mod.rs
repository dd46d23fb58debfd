pub mod nebius;
pub mod traits;
pub mod utils;

pub use nebius::NebiusProvider;
