//! recrypt-portal: an approval-gated proxy in front of the recryptd JSON-RPC
//! wallet interface.
//!
//! Read-only calls pass straight to the daemon. Calls that create keys or move
//! funds are held back: the first attempt registers a pending
//! [`authz::Authorization`] and answers `402`; once an operator accepts it,
//! the caller repeats the request with `auth: <id>` and the authorization is
//! spent on exactly that one execution.

pub mod authz;
pub mod portal;
pub mod rpc;
pub mod utils;
