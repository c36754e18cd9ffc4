pub mod auth_token;
pub mod authorized;
pub mod current_user;
pub mod path_id;
pub mod validated_json;

pub use auth_token::AuthToken;
pub use authorized::{AdminOnly, AdminOrOrganizer, Authorized, ParticipantOnly, Policy};
pub use current_user::{CurrentUser, OptionalUser};
pub use path_id::PathId;
pub use validated_json::{OptionalJson, ValidatedJson};
