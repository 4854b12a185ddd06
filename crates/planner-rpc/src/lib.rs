//! JSON-over-HTTP transport for the planner services.
//!
//! [`RpcServer`] hosts the fifteen Area / Project / Task operations on top of
//! a [`planner_core::Planner`]; [`PlannerClient`] is the matching caller-side
//! facade. Error kinds survive the round trip, so a `NotFound` raised by a
//! service is still a `NotFound` on the client.
//!
//! ```rust,no_run
//! use planner_core::{PlannerBuilder, params::CreateArea};
//! use planner_rpc::{PlannerClient, RpcServer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().in_memory().build().await?;
//! let mut server = RpcServer::new(planner.clone());
//! let address = server.start("127.0.0.1:0").await?;
//!
//! let client = PlannerClient::new(address.to_string())?;
//! let area = client
//!     .create_area(&CreateArea {
//!         name: "Home".to_string(),
//!         description: None,
//!     })
//!     .await?;
//! assert_eq!(client.get_area(&area.id).await?, area);
//!
//! server.stop().await?;
//! planner.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod server;
pub mod wire;

pub use client::PlannerClient;
pub use server::{RpcFailure, RpcServer, router};
pub use wire::{HealthReply, TIMEOUT_HEADER};
