//! The budget split assistant's session handler.
//!
//! Every inbound message goes through the same steps:
//!
//! 1. **Commands** (`/start`, `/help`, `/categories`, `/feedback`) are
//!    answered directly
//! 2. **Classify** the text as a category definition or an amount
//! 3. **Act**: replace the user's category set, or split the amount across it
//! 4. **Reply** on the channel the message came from
//!
//! [`run_session`] drives a [`Channel`](budgetsplit_core::Channel) through
//! this loop until it closes.

pub mod assistant;
pub mod command;
pub mod replies;
pub mod session;

pub use assistant::{BudgetAssistant, Outbound, Outcome};
pub use command::Command;
pub use session::{run_session, run_session_until};
