// Neo4j module - database connection and the shared write session
pub mod connection;
pub mod session;

pub use connection::{connect, verify_connectivity};
pub use session::Neo4jSession;
