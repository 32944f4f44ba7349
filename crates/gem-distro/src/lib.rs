//! Distribution lookups for gembridge
//!
//! Answers "is there a distribution package called X, and which version does
//! it ship?" by asking the official repositories (`pacman -Si`) and, only on
//! a definitive miss, the community overlay (AUR RPC).

pub mod aur;
pub mod error;
pub mod info;
pub mod pacman;
pub mod probe;
pub mod source;

pub use aur::{AurClient, DEFAULT_AUR_URL};
pub use error::{Error, Result};
pub use info::{DistroPackageInfo, ProbeOutcome, Provenance, SourceAnswer, upstream_version};
pub use pacman::{PacmanRepository, parse_pacman_info};
pub use probe::{DEFAULT_PROBE_TIMEOUT, DistroPackageProbe};
pub use source::{CommunityOverlay, OfficialRepository};
