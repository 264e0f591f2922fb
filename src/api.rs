//! Raw profile fetching from the player-data API.

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::http::Transport;
use crate::model::RawProfile;
use crate::schema;

/// Fetches and decodes the profile of `uid`.
///
/// Transport failures, non-2xx statuses and empty bodies give `Ok(None)`;
/// a body that is not a valid profile document is `Err(Error::Decode)`.
pub async fn fetch_raw<T: Transport>(
    config: &Config,
    transport: &T,
    uid: &str,
) -> Result<Option<RawProfile>> {
    let url = config.profile_url(uid);
    let Some(body) = transport.get(&url).await else {
        return Ok(None);
    };
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!(uid, "empty profile response");
        return Ok(None);
    }
    schema::decode(&body).map(Some)
}
