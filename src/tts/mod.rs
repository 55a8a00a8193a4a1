pub mod interface;
pub mod client;
pub mod command;
pub mod factory;

pub use interface::{SpeechSettings, SpeechSynthesizer};
pub use client::HttpSpeechSynthesizer;
pub use command::CommandSpeechSynthesizer;
pub use factory::SpeechSynthesizerFactory;
