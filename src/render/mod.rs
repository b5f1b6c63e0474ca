mod card;
pub mod styles;


pub use card::{render_card, render_card_with};
pub use styles::{CardStyle, CardTheme};
