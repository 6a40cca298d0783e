//! Current-user identity as supplied by the authentication collaborator.
//!
//! Every mutating service operation requires an [`Identity`]. The session
//! itself (token refresh, expiry) is owned by the collaborator; Trellis only
//! asks whether a user is signed in and who they are.

mod domain;
mod session;

pub use domain::{Identity, UserId};
pub use session::{SessionProvider, StaticSessionProvider};
