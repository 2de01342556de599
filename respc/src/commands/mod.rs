//! Typed command methods on [`crate::Client`], grouped the way the Redis
//! command reference groups them.

mod connection;
mod hashes;
mod keys;
mod lists;
mod server;
mod sets;
mod sorted_sets;
mod strings;
