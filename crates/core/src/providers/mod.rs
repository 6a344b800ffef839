pub mod registry;
pub mod traits;

// Collaborator implementations
pub mod frankfurter;
pub mod memory;
