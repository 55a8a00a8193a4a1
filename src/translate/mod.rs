pub mod interface;
pub mod client;
pub mod factory;

pub use interface::{TranslateRequest, TranslateResponse, Translator};
pub use client::HttpTranslator;
pub use factory::TranslatorFactory;
