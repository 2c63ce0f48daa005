//! Infrastructure layer for the receiver.
//!
//! - **`station_client`** – Thin HTTP/1.1 client over `tokio::net` used to
//!   poll the station's cursor endpoint. One request per connection,
//!   `Connection: close`, matching the station's server.

pub mod station_client;
