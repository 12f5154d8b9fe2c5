//! # porkbun-client
//!
//! An async client library for the [Porkbun](https://porkbun.com/) domain
//! registrar API (v3): DNS record management, SSL certificate bundle
//! retrieval, TLD pricing, and connectivity checks.
//!
//! ## Configuration
//!
//! Credentials and tuning parameters resolve from up to five layered
//! sources, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. A JSON config file named by the `PYRK_CONFIG_FILE` environment variable
//! 3. Environment variables (`PYRK_API_KEY`, `PYRK_API_SECRET_KEY`,
//!    `PYRK_FORCE_V4`, `PYRK_RATE`, `PYRK_RETRIES`, `PYRK_TIMEOUT`,
//!    `PYRK_HTTP2`)
//! 4. A JSON config file passed to the builder
//! 5. Values set directly on the builder
//!
//! Resolution fails with [`PorkbunError::Configuration`] unless both
//! credentials are present afterwards.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use porkbun_client::{Client, ClientConfig, CreateRecordRequest, DnsRecordType, RecordQuery};
//!
//! #[tokio::main]
//! async fn main() -> porkbun_client::Result<()> {
//!     // Pulls credentials from the environment / config files.
//!     let config = ClientConfig::builder().build()?;
//!     let client = Client::new(config)?;
//!
//!     println!("connected from {}", client.ping(false).await?);
//!
//!     let records = client
//!         .dns()
//!         .get_records("example.com", &RecordQuery::all())
//!         .await?;
//!     for record in &records {
//!         println!("{} {} -> {}", record.record_type, record.name, record.content);
//!     }
//!
//!     let request = CreateRecordRequest::new(DnsRecordType::A, "198.51.100.45")
//!         .with_name("www");
//!     let created = client.dns().create_record("example.com", &request).await?;
//!     println!("created record {}", created.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! Record names are always zone-relative on both input and output; the empty
//! string denotes the zone apex.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, PorkbunError>`](PorkbunError):
//!
//! - [`PorkbunError::Configuration`] — configuration could not be resolved
//! - [`PorkbunError::Validation`] — invalid input, rejected before any I/O
//! - [`PorkbunError::Api`] — the API processed the request and said no
//! - [`PorkbunError::ApiFailure`] — the response violated the API contract
//! - [`PorkbunError::Network`] / [`PorkbunError::Timeout`] — transport
//!   failures, retried up to the configured count before surfacing

mod client;
mod config;
mod dns;
mod error;
mod logging;
mod normalize;
mod pricing;
mod ssl;
mod types;

pub use client::{CallOptions, Client, JsonObject};
pub use config::{ClientConfig, ConfigBuilder};
pub use dns::Dns;
pub use error::{PorkbunError, Result};
pub use normalize::normalize_name;
pub use pricing::Pricing;
pub use ssl::Ssl;
pub use types::{
    Coupon, CreateRecordRequest, DnsRecord, DnsRecordEdit, DnsRecordType, PricingTable,
    RecordQuery, SslCertificateBundle, TldPricing,
};
