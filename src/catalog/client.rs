use std::path::Path;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::catalog::{
    CompositeHandle, GranuleSet, ImageCatalog, QueryRequest, RegionHandle, ServiceSession,
};
use crate::error::{ExtractionError, Result};
use crate::models::Region;

/// Blocking HTTP implementation of [`ImageCatalog`].
///
/// Authenticates once from the session at construction; every subsequent
/// call carries the bearer token. Failures are not retried here — a re-run
/// resumes from the on-disk completion markers instead.
pub struct RestCatalog {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Deserialize)]
struct HandleResponse {
    id: String,
}

#[derive(Deserialize)]
struct GranuleSetResponse {
    id: String,
    granule_count: u64,
}

impl RestCatalog {
    pub fn connect(base_url: &str, session: &ServiceSession) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = Client::builder().build()?;
        let response = http
            .post(format!("{base_url}/v1/auth"))
            .json(&json!({
                "client_email": session.client_email(),
                "private_key": session.private_key(),
            }))
            .send()?;
        let auth: AuthResponse = check(response)?.json()?;
        Ok(Self {
            http,
            base_url,
            token: auth.token,
        })
    }

    fn post(&self, path: &str, body: &serde_json::Value) -> Result<Response> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .json(body)
            .send()?;
        check(response)
    }

    /// POST a request whose response body is the artifact itself, streamed
    /// straight to `destination`. Fails if the parent directory is missing;
    /// the caller ensures output directories exist before the run starts.
    fn download(&self, path: &str, body: &serde_json::Value, destination: &Path) -> Result<()> {
        let mut response = self.post(path, body)?;
        let mut file = std::fs::File::create(destination)?;
        response.copy_to(&mut file)?;
        Ok(())
    }
}

fn check(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .unwrap_or_else(|_| "no response body".to_string());
    Err(ExtractionError::Service { status, message })
}

impl ImageCatalog for RestCatalog {
    fn load_region(&self, boundary_file: &Path) -> Result<RegionHandle> {
        let region = Region::from_vector_file(boundary_file)?;
        let bytes = std::fs::read(boundary_file)?;
        let response = self
            .http
            .post(format!("{}/v1/regions", self.base_url))
            .bearer_auth(&self.token)
            .query(&[("name", region.name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()?;
        let handle: HandleResponse = check(response)?.json()?;
        Ok(RegionHandle {
            id: handle.id,
            name: region.name,
        })
    }

    fn query(&self, request: &QueryRequest, region: &RegionHandle) -> Result<GranuleSet> {
        request.validate()?;
        let response: GranuleSetResponse = self
            .post(
                "/v1/granules/query",
                &json!({
                    "collection": request.collection,
                    "bands": request.bands,
                    "start": request.start,
                    "end": request.end,
                    "region_id": region.id,
                }),
            )?
            .json()?;
        Ok(GranuleSet {
            id: response.id,
            granule_count: response.granule_count,
        })
    }

    fn mask_clouds(
        &self,
        granules: &GranuleSet,
        cloud_band: &str,
        max_cloud_fraction: f64,
    ) -> Result<GranuleSet> {
        let response: GranuleSetResponse = self
            .post(
                &format!("/v1/granules/{}/mask", granules.id),
                &json!({
                    "band": cloud_band,
                    "less_than": max_cloud_fraction,
                }),
            )?
            .json()?;
        Ok(GranuleSet {
            id: response.id,
            granule_count: response.granule_count,
        })
    }

    fn clip(&self, granules: &GranuleSet, region: &RegionHandle) -> Result<GranuleSet> {
        let response: GranuleSetResponse = self
            .post(
                &format!("/v1/granules/{}/clip", granules.id),
                &json!({ "region_id": region.id }),
            )?
            .json()?;
        Ok(GranuleSet {
            id: response.id,
            granule_count: response.granule_count,
        })
    }

    fn composite_median(&self, granules: &GranuleSet) -> Result<CompositeHandle> {
        let response: HandleResponse = self
            .post(
                &format!("/v1/granules/{}/composite", granules.id),
                &json!({ "method": "median" }),
            )?
            .json()?;
        Ok(CompositeHandle { id: response.id })
    }

    fn export_zonal_mean(
        &self,
        composite: &CompositeHandle,
        region: &RegionHandle,
        scale_m: u32,
        destination: &Path,
    ) -> Result<()> {
        self.download(
            &format!("/v1/composites/{}/zonal-statistics", composite.id),
            &json!({
                "region_id": region.id,
                "statistic": "MEAN",
                "scale_m": scale_m,
                "format": "csv",
            }),
            destination,
        )
    }

    fn export_raster(
        &self,
        composite: &CompositeHandle,
        region: &RegionHandle,
        scale_m: u32,
        destination: &Path,
    ) -> Result<()> {
        self.download(
            &format!("/v1/composites/{}/export", composite.id),
            &json!({
                "region_id": region.id,
                "scale_m": scale_m,
                "file_per_band": true,
                "format": "geotiff",
            }),
            destination,
        )
    }
}
