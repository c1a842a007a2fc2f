pub mod auth;
pub mod chat;
pub mod content;
pub mod dashboard;
pub mod inbox;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod reservations;
