//! SCP Wiki - An in-memory catalogue of anomalous objects
//!
//! This library provides the data store, services and application state
//! machine behind the SCP Wiki console.

pub mod app;
pub mod config;
pub mod console;
pub mod db;
pub mod models;
pub mod services;
