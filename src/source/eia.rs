//! HTTP client for the public energy-data REST API (v2).

use reqwest::Client;
use serde::Deserialize;

use super::{
    FetchError, FlowSeries, GenerationFetcher, ImportExportFetcher, SeriesPoint, SeriesWindow,
};
use crate::config::EiaConfig;
use crate::region::RegionId;

const GENERATION_PATH: &str = "electricity/electric-power-operational-data/data/";
const INTERCHANGE_PATH: &str = "seds/data/";

/// Which numeric column of a response row carries the measurement.
#[derive(Debug, Clone, Copy)]
enum Measure {
    Generation,
    Value,
}

impl Measure {
    fn column(self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Value => "value",
        }
    }
}

/// Async client implementing both fetcher traits against the live API.
///
/// One instance is shared for the whole session; `reqwest::Client` pools
/// connections internally.
#[derive(Debug, Clone)]
pub struct EiaClient {
    http: Client,
    base_url: String,
    api_key: String,
    sector_id: u32,
    history_length: u32,
}

impl EiaClient {
    /// Builds a client from the `[eia]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: &EiaConfig) -> Result<Self, FetchError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            sector_id: config.sector_id,
            history_length: config.history_length,
        })
    }

    fn generation_params(&self, fuel: &str, region: &RegionId) -> Vec<(&'static str, String)> {
        vec![
            ("frequency", "annual".to_string()),
            ("data[0]", Measure::Generation.column().to_string()),
            ("facets[fueltypeid][]", fuel.to_string()),
            ("facets[location][]", region.to_string()),
            ("facets[sectorid][]", self.sector_id.to_string()),
            ("offset", "0".to_string()),
        ]
    }

    async fn fetch_points(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        measure: Measure,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, ?params, "requesting annual series");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        decode_points(&body, measure)
    }
}

impl GenerationFetcher for EiaClient {
    async fn generation(
        &self,
        fuel: &str,
        region: &RegionId,
        window: SeriesWindow,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        let mut params = self.generation_params(fuel, region);
        params.push(("start", window.start.to_string()));
        params.push(("end", window.end.to_string()));
        self.fetch_points(GENERATION_PATH, &params, Measure::Generation)
            .await
    }

    async fn generation_history(
        &self,
        fuel: &str,
        region: &RegionId,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        let mut params = self.generation_params(fuel, region);
        params.push(("sort[0][column]", "period".to_string()));
        params.push(("sort[0][direction]", "desc".to_string()));
        params.push(("length", self.history_length.to_string()));
        self.fetch_points(GENERATION_PATH, &params, Measure::Generation)
            .await
    }
}

impl ImportExportFetcher for EiaClient {
    async fn interchange(
        &self,
        series: FlowSeries,
        region: &RegionId,
        window: SeriesWindow,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        let params = vec![
            ("frequency", "annual".to_string()),
            ("data[0]", Measure::Value.column().to_string()),
            ("facets[seriesId][]", series.series_id().to_string()),
            ("facets[stateId][]", region.to_string()),
            ("offset", "0".to_string()),
            ("start", window.start.to_string()),
            ("end", window.end.to_string()),
        ];
        self.fetch_points(INTERCHANGE_PATH, &params, Measure::Value)
            .await
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    data: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct Row {
    period: Option<Lenient>,
    generation: Option<Lenient>,
    value: Option<Lenient>,
}

/// The API serialises numbers as JSON strings for some datasets and as
/// numbers for others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
}

impl Lenient {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_year(&self) -> Option<i32> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i32),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn decode_points(body: &str, measure: Measure) -> Result<Vec<SeriesPoint>, FetchError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let mut points = Vec::with_capacity(envelope.response.data.len());
    for row in envelope.response.data {
        let Some(year) = row.period.as_ref().and_then(Lenient::as_year) else {
            tracing::debug!(?row, "skipping row without an annual period");
            continue;
        };
        let field = match measure {
            Measure::Generation => row.generation.as_ref(),
            Measure::Value => row.value.as_ref(),
        };
        points.push(SeriesPoint {
            year,
            value: field.and_then(Lenient::as_f64),
        });
    }
    Ok(points)
}
