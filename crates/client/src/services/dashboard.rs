use chrono::NaiveDate;
use conciliador_core::DashboardStats;

use crate::client::ApiClient;
use crate::error::ClientError;

pub struct DashboardService<'a> {
    api: &'a ApiClient,
}

impl<'a> DashboardService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /api/dashboard/estadisticas?desde&hasta`
    pub async fn estadisticas(&self, desde: NaiveDate, hasta: NaiveDate) -> Result<Vec<DashboardStats>, ClientError> {
        let query = [("desde", desde.to_string()), ("hasta", hasta.to_string())];
        self.api.get("/api/dashboard/estadisticas", &query).await
    }
}
