//! API handlers

pub mod extract;
pub mod home;
