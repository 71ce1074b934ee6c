pub mod application;
pub mod candidate;
pub mod catalog;
pub mod company;
pub mod job;
pub mod resume;
pub mod user;
