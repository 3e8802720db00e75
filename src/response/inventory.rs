use super::deserializers::from_int_to_bool;
use crate::serializers::string;
use crate::types::{AppId, Amount, AssetId, ClassId, ContextId, InstanceId};
use serde::{Serialize, Deserialize};
use std::sync::Arc;

/// An item in an inventory, paired with its description.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Asset {
    /// The app ID e.g. `440` for Team Fortress 2.
    pub appid: AppId,
    /// The context ID.
    #[serde(with = "string")]
    pub contextid: ContextId,
    /// The unique asset ID. This value is unique to the item's `appid` and `contextid`.
    #[serde(with = "string")]
    pub assetid: AssetId,
    /// The amount. If this item is not stackable the amount will be `1`.
    pub amount: Amount,
    /// The description for this item.
    pub classinfo: Arc<ClassInfo>,
}

/// Contains details about an item including names and descriptions.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ClassInfo {
    /// The ID for this classinfo.
    #[serde(with = "string")]
    pub classid: ClassId,
    /// The specific instance ID for this classinfo.
    #[serde(default, with = "string")]
    pub instanceid: InstanceId,
    /// The name of the item.
    pub name: String,
    /// The name of the item on the Steam Community Market.
    #[serde(default)]
    pub market_name: String,
    /// The market hash name. This is used to link to the item on the Steam Community Market.
    #[serde(default)]
    pub market_hash_name: String,
    /// The item's type. This is displayed underneath the name of the game in inventories.
    #[serde(default, rename = "type")]
    pub r#type: String,
    /// The URL to the icon for the item.
    #[serde(default)]
    pub icon_url: String,
    /// Whether this item can be traded or not.
    #[serde(default, deserialize_with = "from_int_to_bool")]
    pub tradable: bool,
    /// Whether this item is marketable or not.
    #[serde(default, deserialize_with = "from_int_to_bool")]
    pub marketable: bool,
}

/// An asset as it appears on the wire, before its description has been
/// attached.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub(crate) struct RawAsset {
    pub appid: AppId,
    #[serde(with = "string")]
    pub contextid: ContextId,
    #[serde(with = "string")]
    pub assetid: AssetId,
    #[serde(with = "string")]
    pub classid: ClassId,
    #[serde(with = "string")]
    pub instanceid: InstanceId,
    #[serde(with = "string")]
    pub amount: Amount,
}
