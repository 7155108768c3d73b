//! Explicit schemas for every record exchanged with the backend.
//! Response types are validated by deserialization; request types (`*Spec`)
//! are validated with `validate()` before they are sent.

pub mod auth;
pub mod candidate;
pub mod election;
pub mod party;
pub mod results;
pub mod user;
pub mod vote;
pub mod voter;

pub use auth::{AuthResponse, Credentials};
pub use candidate::{Candidate, CandidateSpec};
pub use election::{Election, ElectionSpec, ElectionState};
pub use party::{Party, PartySpec};
pub use results::{CandidateTally, ElectionResult};
pub use user::{User, UserSpec};
pub use vote::{VoteReceipt, VoteRequest};
pub use voter::{AllowedVoter, AllowedVoterSpec};
