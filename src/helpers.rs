use crate::error::Error;
use crate::response::ServerTimeResponse;
use crate::transport::{HttpRequest, RequestStrategy};
use crate::types::{CookieMap, HttpClient};
use std::time::Duration;
use reqwest::header;
use reqwest_middleware::ClientBuilder;
use serde::de::DeserializeOwned;
use lazy_regex::{
    regex_is_match,
    regex_captures
};

/// Hostname for the Steam Community.
pub const COMMUNITY_HOSTNAME: &str = "steamcommunity.com";
/// Hostname for the Steam store.
pub const STORE_HOSTNAME: &str = "store.steampowered.com";
/// Hostname for Steam support.
pub const HELP_HOSTNAME: &str = "help.steampowered.com";
/// Hostname for the Steam Web API.
pub const WEB_API_HOSTNAME: &str = "api.steampowered.com";

pub const USER_AGENT_STRING: &str = "Mozilla/5.0 (Linux; U; Android 4.1.1; en-us; Google Nexus 4 - 4.1.1 - API 16 - 768x1280 Build/JRO03S) AppleWebKit/534.30 (KHTML, like Gecko) Version/4.0 Mobile Safari/534.30";

/// Total time allowed for one request, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn get_url(hostname: &str, pathname: &str) -> String {
    format!("https://{hostname}{pathname}")
}

/// Creates the default client. The client holds no cookie store and follows
/// no redirects. Cookies are supplied per-request from the
/// [`CookieStore`](crate::storage::CookieStore), and a redirect to the login
/// page surfaces as an error instead of a login page body.
pub fn get_default_client(user_agent_string: &'static str) -> HttpClient {
    let mut headers = header::HeaderMap::new();

    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(user_agent_string));

    let client = reqwest::ClientBuilder::new()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap();

    ClientBuilder::new(client).build()
}

/// Generates a random sessionid.
pub fn generate_sessionid() -> String {
    // Should look like "37bf523a24034ec06c60ec61"
    (0..12)
        .map(|_| {
            let b = rand::random::<u8>();

            format!("{b:02x?}")
        })
        .collect()
}

/// Cookies identifying the client as the Steam mobile app. Login endpoints
/// only hand out OAuth data when these are present.
pub fn mobile_client_cookies() -> CookieMap {
    CookieMap::from([
        ("mobileClient".into(), "ios".into()),
        ("mobileClientVersion".into(), "2.0.20".into()),
    ])
}

/// Joins cookies into a `Cookie` header value.
pub fn cookies_to_header(cookies: &CookieMap) -> String {
    let mut pairs = cookies.iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>();

    // A deterministic order keeps requests reproducible.
    pairs.sort();
    pairs.join("; ")
}

/// Extracts the name and value from a `Set-Cookie` header value, dropping
/// attributes such as `Path` and `Expires`.
pub fn parse_set_cookie(header: &str) -> Option<(String, String)> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();

    if name.is_empty() {
        return None;
    }

    Some((name.into(), value.trim().into()))
}

/// Fetches Steam's current time. Guard codes and confirmation signatures are
/// keyed to Steam's clock, not ours.
pub(crate) async fn fetch_server_time(
    strategy: &dyn RequestStrategy,
) -> Result<u64, Error> {
    let uri = get_url(WEB_API_HOSTNAME, "/ITwoFactorService/QueryTime/v0001");
    let request = HttpRequest::post(uri)
        .with_form_pairs(vec![("steamid".into(), "0".into())]);
    let body = strategy.request(request).await?;
    let response: ServerTimeResponse = parses_response(&body)?;

    Ok(response.response.server_time)
}

/// Deserializes a response body, detecting the HTML pages Steam serves in
/// place of JSON when something went wrong.
pub fn parses_response<D>(body: &str) -> Result<D, Error>
where
    D: DeserializeOwned
{
    match serde_json::from_str::<D>(body) {
        Ok(body) => Ok(body),
        Err(parse_error) => {
            if regex_is_match!(r#"<h1>Sorry!</h1>"#, body) {
                if let Some((_, message)) = regex_captures!("<h3>(.+)</h3>", body) {
                    Err(Error::Response(message.into()))
                } else {
                    Err(Error::Response("Unexpected error".into()))
                }
            } else if regex_is_match!(r#"<h1>Sign In</h1>"#, body) && regex_is_match!(r#"g_steamID = false;"#, body) {
                Err(Error::NotLoggedIn)
            } else if let Some((_, message)) = regex_captures!(r#"<div id="error_msg">\s*([^<]+)\s*</div>"#, body) {
                Err(Error::Trade(message.trim().into()))
            } else {
                Err(Error::Parse(parse_error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct SuccessResponse {
        success: bool,
    }

    #[test]
    fn generates_sessionid() {
        let sessionid = generate_sessionid();

        assert_eq!(sessionid.len(), 24);
    }

    #[test]
    fn parses_set_cookie_value() {
        let header = "sessionid=37bf523a24034ec06c60ec61; Path=/; Secure";
        let (name, value) = parse_set_cookie(header).unwrap();

        assert_eq!(name, "sessionid");
        assert_eq!(value, "37bf523a24034ec06c60ec61");
    }

    #[test]
    fn set_cookie_without_pair_is_none() {
        assert_eq!(parse_set_cookie("garbage"), None);
        assert_eq!(parse_set_cookie("=value; Path=/"), None);
    }

    #[test]
    fn cookie_header_is_sorted() {
        let cookies = CookieMap::from([
            ("sessionid".into(), "abc".into()),
            ("mobileClient".into(), "ios".into()),
        ]);

        assert_eq!(cookies_to_header(&cookies), "mobileClient=ios; sessionid=abc");
    }

    #[test]
    fn parses_json_response() {
        let response: SuccessResponse = parses_response(r#"{"success":true}"#).unwrap();

        assert!(response.success);
    }

    #[test]
    fn detects_not_logged_in_page() {
        let body = r#"<html><h1>Sign In</h1><script>var g_steamID = false;</script></html>"#;
        let error = parses_response::<SuccessResponse>(body).unwrap_err();

        assert!(matches!(error, Error::NotLoggedIn));
    }

    #[test]
    fn detects_error_page() {
        let body = "<html><h1>Sorry!</h1><h3>There was a problem serving your request.</h3></html>";
        let error = parses_response::<SuccessResponse>(body).unwrap_err();

        assert!(matches!(error, Error::Response(message) if message == "There was a problem serving your request."));
    }
}
