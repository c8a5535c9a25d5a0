//! # Repository Module
//!
//! Database repositories for HealthPost.
//!
//! ## Available Repositories
//!
//! - [`slot::SlotRepository`] - Named text slots (the bill history lives in one)

pub mod slot;
