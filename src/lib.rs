// Postbox: contact form backend for a portfolio site.
//
// This is the library root. Each module corresponds to a stage of the
// submission pipeline: rate limiting, spam classification, persistence,
// notification, and the HTTP surface that ties them together.

pub mod config;
pub mod db;
pub mod notify;
pub mod ratelimit;
pub mod spam;
pub mod web;
