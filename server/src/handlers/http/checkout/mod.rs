pub mod quote;

pub use quote::{handle_quote, quote_cart};
