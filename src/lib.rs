//! Chainmon - terminal dashboard for a blockchain node
//!
//! Polls a node's JSON-RPC interface and shows best-block statistics above a
//! mode bar with a clock.
//!
//! ## Architecture
//!
//! Views draw into private [`canvas::Canvas`] surfaces and project them into
//! a shared [`screen::Screen`]; the binary flushes that screen to the
//! terminal through ratatui. Events from the poller, the ticker and the
//! keyboard are routed by [`app::App`].
//!
//! ```bash
//! cargo run -- --rpc-url http://127.0.0.1:8332/ --rpc-cookie-file ~/.bitcoin/.cookie
//! ```

// Core modules (no terminal required)
pub mod config;
pub mod modes;
pub mod types;
pub mod util_text;

// Node access
pub mod net;
pub mod rpc_utils;
pub mod source_rpc;

// Drawing
pub mod canvas;
pub mod screen;
pub mod theme;

// Views
pub mod footer;
pub mod monitor;
pub mod stats;

pub mod app;
pub mod logging;

// Terminal input (native-only)
#[cfg(feature = "native")]
pub mod input;

pub use app::App;
pub use config::Config;
pub use footer::{FooterView, ModeSubscriber};
pub use modes::Mode;
pub use monitor::{BestBlock, MonitorView};
pub use rpc_utils::{ChainSource, RpcClient};
pub use screen::{Screen, SharedScreen};
pub use types::{AppEvent, ModeRequest};
