//! PIN re-verification protocol.
//!
//! A sensitive action runs inside [`PinVerifier::run_with_verification`]:
//! the verifier owns the prompt surface, so only one loop can use it at a
//! time, and the loop only ends on success, cancellation or a lockout
//! redirect.

pub mod code;
pub mod lockout;
pub mod navigator;
pub mod outcome;
pub mod prompt;
pub mod response;
pub mod verifier;

pub use self::code::{PinCode, PinFormatError};
pub use self::lockout::{LockoutInfo, format_seconds_to_hms};
pub use self::navigator::{Navigator, Redirect, TerminalNavigator};
pub use self::outcome::ActionOutcome;
pub use self::prompt::{Cancelled, PinPrompt, StaticPin, TerminalPrompt};
pub use self::response::ResponseLike;
pub use self::verifier::{PinVerifier, VerificationError};
