//! Data layer: row types, loading, filtering and export.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<RawRecord>
//!   └──────────┘
//!        │
//!        ▼   (pipeline)
//!   ┌────────────────────┐
//!   │ Vec<Recommendation> │  fixed export projection
//!   └────────────────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │  filter   │   │  export   │  .csv / .parquet / text preview
//!   └──────────┘   └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
