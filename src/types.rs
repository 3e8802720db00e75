//! Types for common values in Steam responses.

use std::collections::HashMap;
use reqwest_middleware::ClientWithMiddleware;

/// Uniquely identifies an application on Steam. For example: 440 for Team Fortress 2.
pub type AppId = u32;
/// A context ID belonging to an [`AppId`].
pub type ContextId = u64;
/// An asset ID unique to an [`AppId`] + [`ContextId`] combination.
pub type AssetId = u64;
/// An amount for stackable items. For non-stackable items this is simply `1`.
pub type Amount = u32;
/// An ID for a class of items which share a description.
pub type ClassId = u64;
/// A more specific instance of a class, for example a Team Fortress 2 item
/// which is painted.
pub type InstanceId = u64;
/// An ID of a trade offer.
pub type TradeOfferId = u64;

pub use crate::time::ServerTime;

/// Cookies keyed by name. This is the unit the cookie store works in; the
/// HTTP client itself never retains cookies.
pub type CookieMap = HashMap<String, String>;

pub(crate) type HttpClient = ClientWithMiddleware;
