//! Contract bindings for the token contracts the manager talks to.
//!
//! Only the ERC20 surface is needed: metadata reads, balance and allowance
//! queries, `transfer`/`approve` writes and the `Transfer`/`Approval` events.
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod token;

pub use token::IERC20;
