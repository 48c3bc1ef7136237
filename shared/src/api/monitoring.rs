use super::ApiClient;
use crate::error::ApiResult;
use crate::http::{HttpClient, HttpMethod};
use crate::models::{AccessCheckRequest, AccessCheckResponse, AccessLog};
use crate::monitor::SystemStatus;
use crate::pagination::{Page, PageQuery};
use crate::protocol::{
    MY_ACCESS_LOGS_PATH, MonitoringAck, MonitoringStatusRequest, StartMonitoring, StopMonitoring,
};

impl<C: HttpClient> ApiClient<C> {
    /// 当前登录用户自己的通行记录
    pub async fn my_access_logs(&self, query: &PageQuery) -> ApiResult<Page<AccessLog>> {
        let page: Page<AccessLog> = self
            .request(
                HttpMethod::Get,
                MY_ACCESS_LOGS_PATH,
                None,
                &query.to_query_pairs(),
            )
            .await?;
        Ok(page.normalized())
    }

    /// 手动核验车牌（大小写与空格由服务端归一化）
    pub async fn check_access(&self, license_plate: &str) -> ApiResult<AccessCheckResponse> {
        let req = AccessCheckRequest {
            license_plate: license_plate.trim().to_string(),
        };
        self.call(&req).await
    }

    pub async fn start_monitoring(&self) -> ApiResult<MonitoringAck> {
        self.call(&StartMonitoring).await
    }

    pub async fn stop_monitoring(&self) -> ApiResult<MonitoringAck> {
        self.call(&StopMonitoring).await
    }

    pub async fn monitoring_status(&self) -> ApiResult<SystemStatus> {
        self.call(&MonitoringStatusRequest).await
    }
}
