use api_types::error::ErrorBody;
use api_types::voucher::{CorrectionRequest, CorrectionResult, VoucherDetailResponse};
use reqwest::Url;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    /// The server answered with a structured error body.
    #[error("{code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Error code to surface in the submission state machine.
    ///
    /// Server taxonomy codes pass through verbatim; failures that never
    /// reached the server report as `TRANSPORT_FAILURE`.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Api { code, .. } => code,
            Self::BaseUrl(_) | Self::Transport(_) => "TRANSPORT_FAILURE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::BaseUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Submit a correction for the voucher identified by `record_id`.
    pub async fn correct_transaction(
        &self,
        username: &str,
        password: &str,
        record_id: Uuid,
        request: &CorrectionRequest,
    ) -> Result<CorrectionResult, ClientError> {
        let endpoint = self
            .base_url
            .join(&format!("vouchers/{record_id}/correct"))
            .map_err(|err| ClientError::BaseUrl(err.to_string()))?;

        let res = self
            .http
            .post(endpoint)
            .basic_auth(username, Some(password))
            .json(request)
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<CorrectionResult>().await?);
        }
        Err(api_error(res).await)
    }

    /// Fetch a voucher with its rows, e.g. to seed the correction editor.
    pub async fn voucher_detail(
        &self,
        username: &str,
        password: &str,
        id: Uuid,
    ) -> Result<VoucherDetailResponse, ClientError> {
        let endpoint = self
            .base_url
            .join(&format!("vouchers/{id}"))
            .map_err(|err| ClientError::BaseUrl(err.to_string()))?;

        let res = self
            .http
            .get(endpoint)
            .basic_auth(username, Some(password))
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<VoucherDetailResponse>().await?);
        }
        Err(api_error(res).await)
    }
}

async fn api_error(res: reqwest::Response) -> ClientError {
    let status = res.status().as_u16();
    let body = res.json::<ErrorBody>().await.unwrap_or_else(|_| ErrorBody {
        code: "UNKNOWN".to_string(),
        message: "unknown error".to_string(),
    });

    ClientError::Api {
        status,
        code: body.code,
        message: body.message,
    }
}
