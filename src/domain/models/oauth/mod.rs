pub mod linkedin_profile;

pub use linkedin_profile::*;
