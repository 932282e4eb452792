use axum::http::{HeaderMap, header};
use regex::Regex;
use std::sync::LazyLock;

/// Known automation signatures: generic crawler markers, headless/audit tooling,
/// and the link-unfurl fetchers of the major social and chat platforms.
const BOT_SIGNATURES: &str = r"(?i)(bot|crawler|spider|preview|headless|lighthouse|facebookexternalhit|slackbot|embedly|discordbot|linkedinbot|whatsapp|telegrambot)";

static BOT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BOT_SIGNATURES).expect("bot signature pattern is a valid regex"));

/// is_bot_traffic
///
/// Classifies a client identification string (usually the User-Agent) as automated traffic.
///
/// Absent or empty input is treated as human: the classifier fails safe and never
/// marks an indeterminate request as a bot.
pub fn is_bot_traffic(user_agent: Option<&str>) -> bool {
    match user_agent {
        Some(ua) if !ua.is_empty() => BOT_PATTERN.is_match(ua),
        _ => false,
    }
}

/// Applies `is_bot_traffic` to the request's `User-Agent` header.
/// A header that is not valid UTF-8 counts as absent.
pub fn is_bot_request(headers: &HeaderMap) -> bool {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    is_bot_traffic(user_agent)
}
