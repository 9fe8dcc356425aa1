pub mod accuracy;
pub mod data_feed;
pub mod export;
pub mod fixtures;
pub mod normalizer;
pub mod notifier;
pub mod odds_feed;
pub mod predictor;
pub mod value_bets;

#[cfg(test)]
mod stub_server;

pub use accuracy::*;
pub use data_feed::*;
pub use export::*;
pub use fixtures::*;
pub use normalizer::*;
pub use notifier::*;
pub use odds_feed::*;
pub use predictor::*;
pub use value_bets::*;
