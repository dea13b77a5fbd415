//! JSON-lines adapters used by the `run` command.

pub mod order_reader;
pub mod response_writer;
