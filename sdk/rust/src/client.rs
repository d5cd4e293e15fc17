use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /route`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutePlanRequest {
    /// `[lon, lat]` pairs: start, via points, end.
    pub points: Vec<[f64; 2]>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,

    /// Provider-specific custom model (GraphHopper).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_model: Option<Value>,

    /// Exclusion tags such as "ferry" or "toll" (Mapbox).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl RoutePlanRequest {
    pub fn between(start: [f64; 2], end: [f64; 2]) -> Self {
        Self {
            points: vec![start, end],
            ..Default::default()
        }
    }
}

/// Status and JSON body of a planner response.
#[derive(Debug, Clone)]
pub struct RouteResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RouteResponse {
    /// The `error` message of a failed request.
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

pub struct PlannerClient {
    client: Client,
    planner_url: String,
}

impl PlannerClient {
    pub fn new(planner_url: &str) -> Self {
        Self {
            client: Client::builder().no_proxy().build().unwrap_or_default(),
            planner_url: planner_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the planner for a route.
    pub async fn request_route(&self, req: &RoutePlanRequest) -> Result<RouteResponse, Box<dyn std::error::Error>> {
        let resp = self.client
            .post(format!("{}/route", self.planner_url))
            .json(req)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Send an arbitrary JSON body to `/route`, e.g. the `start`/`end` form.
    pub async fn request_route_raw(&self, body: &Value) -> Result<RouteResponse, Box<dyn std::error::Error>> {
        let resp = self.client
            .post(format!("{}/route", self.planner_url))
            .json(body)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Split a route geometry into days. `body` is an itinerary request.
    pub async fn plan_itinerary(&self, body: &Value) -> Result<RouteResponse, Box<dyn std::error::Error>> {
        self.post_json("itinerary", body).await
    }

    /// Look up lodgings near each of a list of points.
    pub async fn nearby_lodging(&self, body: &Value) -> Result<RouteResponse, Box<dyn std::error::Error>> {
        self.post_json("lodging/nearby", body).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<RouteResponse, Box<dyn std::error::Error>> {
        let resp = self.client
            .post(format!("{}/{}", self.planner_url, path))
            .json(body)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn health(&self) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}/health", self.planner_url))
            .send()
            .await
    }
}

async fn read_json(resp: Response) -> Result<RouteResponse, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => Ok(RouteResponse { status, body }),
        Err(e) => Err(format!("Planner returned non-JSON body with status {}: {} ({})", status, text, e).into()),
    }
}
