pub mod about;
pub mod bounties;
pub mod claim;
pub mod stats;
pub mod submit;
