pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod feedback;
pub mod images;
pub mod state;
pub mod storage;
pub mod training;
pub mod views;
pub mod workouts;
