//! API clients for the analysis backend

pub mod chat;
pub mod investment;

pub use chat::{ChatApiClient, ChatBackend};
pub use investment::{AnalysisBackend, InvestmentApiClient};

#[cfg(test)]
pub use chat::MockChatBackend;
#[cfg(test)]
pub use investment::MockAnalysisBackend;
