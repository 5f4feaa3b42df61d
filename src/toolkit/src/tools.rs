//! Concrete tool implementations
//!
//! - `get_weather`: current conditions from wttr.in
//! - `get_attraction`: attraction recommendations from the Tavily search API

use crate::{required_arg, string_params_schema, Tool, ToolArgs, ToolSchema};
use config::ToolsConfig;
use error::{CompassError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

fn http_client(cfg: &ToolsConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .map_err(|e| CompassError::config(format!("failed to build HTTP client: {e}")))
}

// ============================================================================
// Weather Tool
// ============================================================================

#[derive(Debug, Deserialize)]
struct WttrReport {
    current_condition: Vec<WttrCondition>,
}

#[derive(Debug, Deserialize)]
struct WttrCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<WttrText>,
}

#[derive(Debug, Deserialize)]
struct WttrText {
    value: String,
}

/// Tool for looking up the current weather of a city
pub struct WeatherTool {
    api_base: String,
    http: Client,
}

impl WeatherTool {
    pub const NAME: &'static str = "get_weather";

    pub fn new(cfg: &ToolsConfig) -> Result<Self> {
        Ok(Self {
            api_base: cfg.weather_api_base.clone(),
            http: http_client(cfg)?,
        })
    }

    fn report_url(&self, city: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| CompassError::config(format!("invalid weather_api_base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CompassError::config("weather_api_base cannot be a base URL"))?
            .pop_if_empty()
            .push(city);
        url.query_pairs_mut().append_pair("format", "j1");
        Ok(url)
    }

    fn fetch(&self, url: reqwest::Url) -> std::result::Result<String, reqwest::Error> {
        self.http.get(url).send()?.error_for_status()?.text()
    }
}

impl Tool for WeatherTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Look up the real-time weather of the given city".to_string(),
            input_schema: string_params_schema(&[("city", "City name, e.g. \"Beijing\"")]),
        }
    }

    fn invoke(&self, args: &ToolArgs) -> Result<String> {
        let city = required_arg(args, Self::NAME, "city")?;
        let url = self.report_url(city)?;

        tracing::debug!(%url, "requesting weather");
        let body = match self.fetch(url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(city, error = %e, "weather request failed");
                return Ok(format!(
                    "Error: weather lookup for {city} failed due to a network problem - {e}"
                ));
            }
        };

        Ok(match format_weather(city, &body) {
            Some(text) => text,
            None => format!("Error: could not read the weather data returned for {city}"),
        })
    }
}

fn format_weather(city: &str, body: &str) -> Option<String> {
    let report: WttrReport = serde_json::from_str(body).ok()?;
    let current = report.current_condition.first()?;
    let desc = current.weather_desc.first()?.value.trim();
    Some(format!(
        "{city} current weather: {desc}, temperature {} °C",
        current.temp_c
    ))
}

// ============================================================================
// Attraction Tool
// ============================================================================

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

/// Tool for recommending attractions given a city and its weather
pub struct AttractionTool {
    api_base: String,
    api_key: Option<String>,
    max_results: usize,
    http: Client,
}

impl AttractionTool {
    pub const NAME: &'static str = "get_attraction";

    pub fn new(cfg: &ToolsConfig) -> Result<Self> {
        Ok(Self {
            api_base: cfg.tavily_api_base.clone(),
            api_key: cfg.tavily_api_key.clone(),
            max_results: cfg.max_search_results,
            http: http_client(cfg)?,
        })
    }

    fn search(&self, api_key: &str, query: &str) -> std::result::Result<String, reqwest::Error> {
        let url = format!("{}/search", self.api_base.trim_end_matches('/'));
        let body = serde_json::json!({
            "query": query,
            "search_depth": "basic",
            "include_answer": true,
            "max_results": self.max_results,
        });
        self.http
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()?
            .error_for_status()?
            .text()
    }
}

impl Tool for AttractionTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Search for tourist attractions in a city that suit the given weather"
                .to_string(),
            input_schema: string_params_schema(&[
                ("city", "City name"),
                ("weather", "Current weather description"),
            ]),
        }
    }

    fn invoke(&self, args: &ToolArgs) -> Result<String> {
        let city = required_arg(args, Self::NAME, "city")?;
        let weather = required_arg(args, Self::NAME, "weather")?;

        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Ok("Error: TAVILY_API_KEY is not configured.".to_string());
        };

        let query = attraction_query(city, weather);
        tracing::debug!(%query, "searching attractions");

        match self.search(api_key, &query) {
            Ok(body) => Ok(format_attractions(&body)
                .unwrap_or_else(|| "Error: could not read the search results.".to_string())),
            Err(e) => {
                tracing::warn!(city, error = %e, "attraction search failed");
                Ok(format!("Error: attraction search failed - {e}"))
            }
        }
    }
}

fn attraction_query(city: &str, weather: &str) -> String {
    format!("best tourist attractions to visit in '{city}' when the weather is '{weather}', with reasons")
}

fn format_attractions(body: &str) -> Option<String> {
    let resp: TavilyResponse = serde_json::from_str(body).ok()?;

    if let Some(answer) = resp.answer.filter(|a| !a.trim().is_empty()) {
        return Some(answer.trim().to_string());
    }

    if resp.results.is_empty() {
        return Some("Sorry, no attraction recommendations were found.".to_string());
    }

    let mut out = String::from("Based on the search results, you may like:");
    for r in &resp.results {
        out.push_str(&format!("\n- {}: {}", r.title.trim(), r.content.trim()));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> ToolArgs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn weather_report_is_formatted() {
        let body = r#"{
            "current_condition": [
                {"temp_C": "21", "weatherDesc": [{"value": "Partly cloudy "}]}
            ]
        }"#;
        assert_eq!(
            format_weather("Paris", body).unwrap(),
            "Paris current weather: Partly cloudy, temperature 21 °C"
        );
        assert!(format_weather("Paris", r#"{"current_condition": []}"#).is_none());
        assert!(format_weather("Paris", "<html>").is_none());
    }

    #[test]
    fn weather_url_escapes_city() {
        let tool = WeatherTool::new(&ToolsConfig::default()).unwrap();
        let url = tool.report_url("San Francisco").unwrap();
        assert_eq!(url.as_str(), "https://wttr.in/San%20Francisco?format=j1");
    }

    #[test]
    fn weather_requires_city() {
        let tool = WeatherTool::new(&ToolsConfig::default()).unwrap();
        let err = tool.invoke(&args(&[("town", "Paris")])).unwrap_err();
        assert!(matches!(err, CompassError::Validation { .. }));
    }

    #[test]
    fn attraction_without_key_reports_error_observation() {
        let tool = AttractionTool::new(&ToolsConfig::default()).unwrap();
        let out = tool
            .invoke(&args(&[("city", "Paris"), ("weather", "sunny")]))
            .unwrap();
        assert!(out.contains("TAVILY_API_KEY"));
    }

    #[test]
    fn attraction_requires_weather() {
        let tool = AttractionTool::new(&ToolsConfig::default()).unwrap();
        let err = tool.invoke(&args(&[("city", "Paris")])).unwrap_err();
        assert!(err.to_string().contains("weather"));
    }

    #[test]
    fn attraction_prefers_answer() {
        let body = r#"{"answer": "Visit the Louvre.", "results": [{"title": "x", "content": "y"}]}"#;
        assert_eq!(format_attractions(body).unwrap(), "Visit the Louvre.");
    }

    #[test]
    fn attraction_falls_back_to_results() {
        let body = r#"{"answer": null, "results": [
            {"title": "Louvre", "content": "Indoor art museum", "url": "https://example.com"},
            {"title": "Orsay", "content": "Impressionists"}
        ]}"#;
        let out = format_attractions(body).unwrap();
        assert!(out.starts_with("Based on the search results"));
        assert!(out.contains("- Louvre: Indoor art museum"));
        assert!(out.contains("- Orsay: Impressionists"));

        let empty = format_attractions(r#"{"results": []}"#).unwrap();
        assert!(empty.contains("no attraction"));
    }
}
