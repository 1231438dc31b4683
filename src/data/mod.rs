//! Data layer: core types, loading, and normalisation.
//!
//! Architecture:
//! ```text
//!  .csv / .xlsx sources
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse files → Coverage (national / per-region blocks)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  keep one region
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ resample  │  mean per calendar year → Series
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  rebase   │  index with base year = 100
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  merge    │  outer join on year → LongTable
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
pub mod rebase;
pub mod resample;
