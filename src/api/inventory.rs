//! Inventory endpoints.

use crate::error::{Error, Result};
use crate::helpers::{get_url, parses_response, COMMUNITY_HOSTNAME};
use crate::manager::AuthManager;
use crate::response::deserializers::{from_int_to_bool, to_classinfo_map};
use crate::response::{Asset, ClassInfo, Inventory, RawAsset};
use crate::serializers::option_string;
use crate::transport::HttpRequest;
use crate::types::{AppId, AssetId, ClassId, ContextId, InstanceId};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use steamid_ng::SteamID;

/// Most items Steam serves per page.
const PAGE_SIZE: u32 = 2000;
/// Pause between page requests.
const PAGE_PAUSE: Duration = Duration::from_secs(1);

/// The API for reading inventories.
#[derive(Clone)]
pub struct InventoryAPI {
    manager: AuthManager,
}

impl InventoryAPI {
    pub fn new(manager: AuthManager) -> Self {
        Self {
            manager,
        }
    }

    /// Fetches a user's tradable inventory for an app and context, paging
    /// through until Steam reports no more items.
    pub async fn get_inventory(
        &self,
        login: &str,
        steamid: SteamID,
        appid: AppId,
        contextid: ContextId,
    ) -> Result<Inventory> {
        self.get_inventory_request(login, steamid, appid, contextid, true).await
    }

    /// As [`InventoryAPI::get_inventory`], but includes untradable items.
    pub async fn get_inventory_with_untradables(
        &self,
        login: &str,
        steamid: SteamID,
        appid: AppId,
        contextid: ContextId,
    ) -> Result<Inventory> {
        self.get_inventory_request(login, steamid, appid, contextid, false).await
    }

    async fn get_inventory_request(
        &self,
        login: &str,
        steamid: SteamID,
        appid: AppId,
        contextid: ContextId,
        tradable_only: bool,
    ) -> Result<Inventory> {
        #[derive(Deserialize)]
        struct GetInventoryResponse {
            #[serde(default, deserialize_with = "from_int_to_bool")]
            success: bool,
            #[serde(default, deserialize_with = "from_int_to_bool")]
            more_items: bool,
            #[serde(default)]
            assets: Vec<RawAsset>,
            #[serde(default, deserialize_with = "to_classinfo_map")]
            descriptions: HashMap<(ClassId, InstanceId), Arc<ClassInfo>>,
            #[serde(default, with = "option_string")]
            last_assetid: Option<AssetId>,
        }

        let sid = u64::from(steamid);
        let uri = get_url(COMMUNITY_HOSTNAME, &format!("/inventory/{sid}/{appid}/{contextid}"));
        let referer = get_url(COMMUNITY_HOSTNAME, &format!("/profiles/{sid}/inventory"));
        let mut responses: Vec<GetInventoryResponse> = Vec::new();
        let mut start_assetid: Option<AssetId> = None;

        loop {
            let mut request = HttpRequest::get(&uri)
                .with_header("Referer", &referer)
                .with_param("l", "english")
                .with_param("count", PAGE_SIZE.to_string());

            if let Some(start_assetid) = start_assetid {
                request = request.with_param("start_assetid", start_assetid.to_string());
            }

            let body = self.manager.request_for_login(login, request).await?;
            let response: GetInventoryResponse = parses_response(&body)?;

            if !response.success {
                return Err(Error::Response("Bad response".into()));
            } else if response.more_items {
                // shouldn't occur, but we wouldn't want to page endlessly if it does
                if response.last_assetid == start_assetid {
                    return Err(Error::Response("Bad response".into()));
                }

                start_assetid = response.last_assetid;
                responses.push(response);
                tokio::time::sleep(PAGE_PAUSE).await;
            } else {
                responses.push(response);
                break;
            }
        }

        let mut descriptions = HashMap::new();
        let mut raw_assets = Vec::new();

        for response in responses {
            descriptions.extend(response.descriptions);
            raw_assets.extend(response.assets);
        }

        let mut inventory = Inventory::new();

        for raw in raw_assets {
            let classinfo = descriptions.get(&(raw.classid, raw.instanceid))
                .cloned()
                .ok_or_else(|| Error::Response(
                    format!("Missing descriptions for item {}:{}", raw.classid, raw.instanceid)
                ))?;

            if tradable_only && !classinfo.tradable {
                continue;
            }

            inventory.push(Asset {
                appid: raw.appid,
                contextid: raw.contextid,
                assetid: raw.assetid,
                amount: raw.amount,
                classinfo,
            });
        }

        Ok(inventory)
    }
}
