//! Client for the third-party people-data API.
//!
//! Only the people-search operation is wired up; the API is treated strictly
//! as an external collaborator behind this module's types.

pub mod client;
pub mod types;

pub use client::{ProspectClient, UsageInfo};
pub use types::{
    Company, OneOrMany, Pagination, PeopleSearchPage, PeopleSearchQuery, Person,
};
