// src/site/mod.rs

//! Session and page enumeration for the course site.

pub mod auth;
pub mod course;

pub use course::CourseUrls;
