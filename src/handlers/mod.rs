pub mod advice;
pub mod days;
pub mod entries;
pub mod health;
pub mod stats;
