//! Response types.

mod accepted_offer;
mod authorization_status;
mod confirmation;
mod inventory;
mod login;
mod price_history;
mod rsa_key;
mod sent_offer;
mod server_time;
pub mod deserializers;

pub use accepted_offer::AcceptedOffer;
pub use authorization_status::AuthorizationStatus;
pub use confirmation::MobileConfirmation;
pub use inventory::{Asset, ClassInfo};
pub use login::{LoginResponse, OAuthData, TransferInfo, TransferParameters};
pub use price_history::{PriceHistory, PricePoint};
pub use rsa_key::RsaKey;
pub use sent_offer::SentOffer;
pub use server_time::ServerTimeResponse;

pub(crate) use inventory::RawAsset;

pub type Inventory = Vec<Asset>;
