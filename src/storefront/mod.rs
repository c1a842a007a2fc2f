//! Client-side state for the customer-facing site. Nothing here performs
//! I/O on its own; network calls go through [`crate::client`] or a
//! [`chat::ChatBackend`].

pub mod cart;
pub mod chat;
pub mod slots;

pub use cart::{Cart, CartError, CartLine, CustomerDetails};
pub use chat::{ChatBackend, ChatMessage, ChatSession, Sender};
pub use slots::{GuestDetails, SlotError, SlotPicker};
