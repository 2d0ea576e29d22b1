pub mod composing;
pub mod conversion;
pub mod romaji;
pub mod settings;
pub mod unicode;
