//! Domain logic: typed records, trade planning, portfolio valuation.

pub mod account;
pub mod error;
pub mod portfolio;
pub mod position;
pub mod quote;
pub mod trade;
