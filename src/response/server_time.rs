use crate::serializers::string;
use serde::Deserialize;

/// The response from `ITwoFactorService/QueryTime`. Guard codes and
/// confirmation signatures are computed against this clock, never the local
/// one.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerTimeResponse {
    pub response: ServerTimeData,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerTimeData {
    /// Unix time on Steam's servers.
    #[serde(with = "string")]
    pub server_time: u64,
}
