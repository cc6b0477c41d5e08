use color_eyre::{Result, eyre::Context, eyre::eyre};
use log::{debug, info};
use reqwest::{StatusCode, Url};
use reqwest::blocking::Client;
use serde_json::Value;

/// Downloads raw market schedules from the feed.
pub struct Fetcher {
    client: Client,
    schedule_url: String,
}

impl Fetcher {
    pub fn new(schedule_url: &str, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .wrap_err("failed to build HTTP client")?;
        Ok(Self {
            client,
            schedule_url: schedule_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn market_url(&self, market: &str) -> Result<Url> {
        Url::parse(&format!("{}/{market}", self.schedule_url))
            .wrap_err_with(|| format!("bad schedule url for market {market}"))
    }

    /// Returns the document as published so it can be cached unchanged.
    pub fn fetch_schedule(&self, market: &str) -> Result<Value> {
        let url = self.market_url(market)?;
        debug!("Fetching {url}");

        let res = self
            .client
            .get(url)
            .send()
            .wrap_err_with(|| format!("error fetching schedule for {market}"))?;
        let status = res.status();
        let body: Value = res
            .json()
            .wrap_err_with(|| format!("schedule for {market} is not JSON (HTTP {status})"))?;

        let body = check_response(market, status, body)?;
        info!("Fetched schedule for {market}");
        Ok(body)
    }
}

/// Accepts only a successful response carrying a `data` object, so a bad
/// download never replaces the cached schedule.
fn check_response(market: &str, status: StatusCode, body: Value) -> Result<Value> {
    if let Some(code) = upstream_error(&body) {
        return Err(eyre!("HTTP {code}. Are you sure market '{market}' exists?"));
    }
    if !status.is_success() {
        return Err(eyre!("HTTP {status} fetching schedule for {market}"));
    }
    if !body.is_object() {
        return Err(eyre!("schedule for {market} is not a JSON object"));
    }
    if !body.get("data").is_some_and(Value::is_object) {
        return Err(eyre!("schedule for {market} has no data"));
    }
    Ok(body)
}

/// The feed reports failures in-band as `{"error": {"errorCode": {"code": ..}}}`.
fn upstream_error(body: &Value) -> Option<String> {
    let error = body.get("error").filter(|e| !e.is_null())?;
    Some(match error.pointer("/errorCode/code") {
        Some(Value::String(code)) => code.clone(),
        Some(Value::Number(code)) => code.to_string(),
        _ => "error".to_owned(),
    })
}
