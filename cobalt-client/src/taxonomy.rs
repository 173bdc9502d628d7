//! Error code taxonomy
//!
//! Maps the backend's dot-namespaced error codes (and the client's own
//! `error.net.*` codes) to human-readable descriptions. The mapping is
//! advisory: codes missing from it resolve to themselves.

/// Local code: the liveness probe failed before the request was sent.
pub const NET_GENERIC: &str = "error.net.generic";

/// Local code: the request could not be sent to the backend.
pub const NET_FAILED: &str = "error.net.failed";

/// Local code: the backend answered with something that is not a valid response.
pub const NET_INVALID_RESPONSE: &str = "error.net.invalid_response";

/// Every code with a known description, in taxonomy order.
pub const KNOWN_CODES: &[&str] = &[
    "error.api.auth.key.invalid",
    "error.api.auth.jwt.missing",
    "error.api.auth.jwt.invalid",
    "error.api.auth.turnstile.missing",
    "error.api.auth.turnstile.invalid",
    "error.api.rate_exceeded",
    "error.api.capacity",
    "error.api.generic",
    "error.api.unknown_response",
    "error.api.service.unsupported",
    "error.api.service.disabled",
    "error.api.link.invalid",
    "error.api.link.unsupported",
    "error.api.fetch.fail",
    "error.api.fetch.critical",
    "error.api.fetch.empty",
    "error.api.fetch.rate",
    "error.api.content.too_long",
    "error.api.content.video.unavailable",
    "error.api.content.video.live",
    "error.api.content.video.age",
    "error.api.content.video.private",
    "error.api.content.video.region",
    "error.api.youtube.codec",
    "error.api.youtube.decipher",
    "error.api.youtube.login",
    "error.api.youtube.token_expired",
    "error.api.youtube.no_hls_streams",
    NET_FAILED,
    NET_GENERIC,
    NET_INVALID_RESPONSE,
];

/// Description of a known error code, `None` for anything else.
#[must_use]
pub fn describe(code: &str) -> Option<&'static str> {
    let description = match code {
        "error.api.auth.key.invalid" => "no api key was provided, please provide an api key to use this server",
        "error.api.auth.jwt.missing" => "this server supports API keys, but you didn't provide one",
        "error.api.auth.jwt.invalid" => "the api key you provided is invalid",
        "error.api.auth.turnstile.missing" => "this instance uses turnstile",
        "error.api.auth.turnstile.invalid" => "the turnstile token you provided is invalid",
        "error.api.rate_exceeded" => "you are making too many requests! try again later",
        "error.api.capacity" => "this cobalt server can't process your request right now",
        "error.api.generic" => {
            "something went wrong on the server side, try again, and if it still doesn't work, contact the server owner"
        }
        "error.api.unknown_response" => "the server returned an unknown response",
        "error.api.service.unsupported" => "this cobalt server doesn't support the service you're trying to use",
        "error.api.service.disabled" => "the service you're trying to download is disabled on this server",
        "error.api.link.invalid" => "the link you provided is invalid, is this a valid link?",
        "error.api.link.unsupported" => {
            "the link you provided is supported, but cobalt couldn't recognize it, is your link correct?"
        }
        "error.api.fetch.fail" => "an unknown error occurred while fetching the media, does this link works?",
        "error.api.fetch.critical" => {
            "the service you're trying to download is returning something unexpected, try again later"
        }
        "error.api.fetch.empty" => {
            "the service you're trying to download is returning an empty response, try again later"
        }
        "error.api.fetch.rate" => {
            "the cobalt server got rate-limited by the service you're trying to download, try again later"
        }
        "error.api.content.too_long" => {
            "the media you're trying to download is too long, try downloading a shorter video"
        }
        "error.api.content.video.unavailable" => {
            "either the video you're trying to download is region-locked, or the service is blocking cobalt"
        }
        "error.api.content.video.live" => {
            "the video you're trying to download is live, and cobalt can't download live videos"
        }
        "error.api.content.video.age" => {
            "the video you're trying to download is age-restricted, and cobalt can't download age-restricted videos"
        }
        "error.api.content.video.private" => {
            "the video you're trying to download is private, make sure it's public or unlisted"
        }
        "error.api.content.video.region" => "the video you're trying to download is region restricted",
        "error.api.youtube.codec" => {
            "try using a different codec, this video doesn't have the codec you're trying to download"
        }
        "error.api.youtube.decipher" => "cobalt couldn't decipher the video, try again later",
        "error.api.youtube.login" => "youtube marked the processing server as a bot, tell the owner to check cookies",
        "error.api.youtube.token_expired" => {
            "the youtube token expired, try again in a few seconds, but if it still doesn't work, tell the instance owner about this error"
        }
        "error.api.youtube.no_hls_streams" => {
            "the video you're trying to download doesn't have any HLS streams, try other settings"
        }
        NET_FAILED => {
            "unable to connect to the cobalt server, check your internet connection, the server status, and try again"
        }
        NET_GENERIC => "an unknown error occurred while connecting to the cobalt server.",
        NET_INVALID_RESPONSE => "the cobalt server returned an invalid response, try again later",
        _ => return None,
    };
    Some(description)
}

/// Render an error code for display.
///
/// Known codes become `"<description> (<code>)"`; unknown codes are
/// returned unchanged so new backend codes still show up verbatim.
#[must_use]
pub fn resolve(code: &str) -> String {
    match describe(code) {
        Some(description) => format!("{description} ({code})"),
        None => code.to_string(),
    }
}
