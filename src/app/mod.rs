//! The demo application behind the gate.
//!
//! An auction anyone can bid on and a deliberately weak signup/login pair.
//! Both exist to give the gate something worth attacking.

pub mod accounts;
pub mod auction;

pub use accounts::AccountStore;
pub use auction::AuctionHouse;
