//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 responder: one request line in, one
//! response out, then the connection is closed. No keep-alive, no request
//! headers or bodies, no ranges or chunking.
//!
//! # Architecture
//!
//! - **`connection`**: Drives one accepted connection through its states
//! - **`request`**: Request-line parsing
//! - **`resolver`**: Maps request paths onto the serve root
//! - **`response`**: Status codes, responses, builder and error pages
//! - **`writer`**: Serializes the head and streams the body
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read the request line
//!        └──────┬──────┘
//!               │ Request line parsed (otherwise → Closed, no response)
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Classify path, build response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send head + body to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use serverium::http::connection::Connection;
//! use serverium::http::resolver::ServeRoot;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let root = Arc::new(ServeRoot::new("./site".as_ref()).await?);
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let root = Arc::clone(&root);
//!         tokio::spawn(async move {
//!             let _ = Connection::new(socket, root).run().await;
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
