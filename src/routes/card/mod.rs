mod handler;

pub use handler::{delete_card, get_card, list_cards, put_card};
