use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpClient, HttpMethod};
use crate::pagination::{Collected, Page, PageQuery, collect_pages};
use crate::models::{ParkingSpace, ParkingSpaceUpdate};
use crate::protocol::{ParkingSpaces, Payments, Resource};
use std::marker::PhantomData;

/// 通用分页资源服务
///
/// 所有资源共用同一套分页与增删改查逻辑，差异只在 [`Resource`] 的关联类型与路径。
pub struct ResourceService<R, C> {
    client: ApiClient<C>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, C> Clone for ResourceService<R, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn resource<R: Resource>(&self) -> ResourceService<R, C> {
        ResourceService {
            client: self.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource, C: HttpClient> ResourceService<R, C> {
    fn item_path(id: i64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    /// 获取一页数据
    ///
    /// 没有令牌时直接返回 `Unauthorized`，不发请求。
    pub async fn list(&self, query: &PageQuery) -> ApiResult<Page<R::Item>> {
        if !self.client.is_authenticated() {
            log::debug!("skipping {} list: no session", R::NAME);
            return Err(ApiError::Unauthorized);
        }
        let page: Page<R::Item> = self
            .client
            .request(HttpMethod::Get, R::PATH, None, &query.to_query_pairs())
            .await?;
        Ok(page.normalized())
    }

    /// 逐页取回整个集合，见 [`collect_pages`]
    pub async fn collect(
        &self,
        size: u32,
        max_pages: u32,
        past_end: impl Fn(&R::Item) -> bool,
    ) -> ApiResult<Collected<R::Item>> {
        collect_pages(size, max_pages, past_end, |query| async move {
            self.list(&query).await
        })
        .await
    }

    pub async fn get(&self, id: i64) -> ApiResult<R::Item> {
        self.client
            .request(HttpMethod::Get, &Self::item_path(id), None, &[])
            .await
    }

    pub async fn create(&self, dto: &R::Create) -> ApiResult<R::Item> {
        self.client.send_json(HttpMethod::Post, R::PATH, dto).await
    }

    pub async fn update(&self, id: i64, dto: &R::Update) -> ApiResult<R::Item> {
        self.client
            .send_json(HttpMethod::Put, &Self::item_path(id), dto)
            .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        // 后端可能返回 204 或被删除的对象，这里只关心是否成功
        let _: serde_json::Value = self
            .client
            .request(HttpMethod::Delete, &Self::item_path(id), None, &[])
            .await?;
        Ok(())
    }

    /// 加载失败时展示的文案
    pub fn fetch_failed_message() -> String {
        format!("Failed to fetch {}", R::NAME)
    }
}

impl<C: HttpClient> ResourceService<Payments, C> {
    /// 住户确认付款，请求体为空对象；只关心是否成功
    pub async fn mark_as_paid(&self, id: i64) -> ApiResult<()> {
        let path = format!("{}/mark_as_paid", Self::item_path(id));
        let _: serde_json::Value = self
            .client
            .send_json(HttpMethod::Post, &path, &serde_json::json!({}))
            .await?;
        Ok(())
    }
}

impl<C: HttpClient> ResourceService<ParkingSpaces, C> {
    /// 逐个把车位标记为已分配，遇到第一个失败即停止
    pub async fn allocate(&self, ids: &[i64]) -> ApiResult<Vec<ParkingSpace>> {
        let dto = ParkingSpaceUpdate {
            is_allocated: Some(true),
            ..Default::default()
        };
        let mut updated = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.update(id, &dto).await {
                Ok(space) => updated.push(space),
                Err(err) => {
                    log::warn!(
                        "allocating parking space #{id} failed after {} of {}: {err}",
                        updated.len(),
                        ids.len()
                    );
                    return Err(err);
                }
            }
        }
        Ok(updated)
    }
}
