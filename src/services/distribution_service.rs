//! 批量分发：把一个模板的实例发给一组用户。
//! 目标集切成固定大小的批次，每批一个事务并发提交；
//! 批次只追加新实例、不读写共享计数，批与批之间无需协调。
//! 某一批失败不回滚其他已提交批次，结果按批次聚合上报。

use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::segment_service::SegmentService;
use crate::services::{issuer, template_service};
use chrono::Utc;
use futures_util::future::join_all;

/// 单个原子批次的写入上限（平台硬顶）
pub const MAX_BATCH_WRITES: usize = 500;

/// 已解析好的发放物：分发前一次性读出，批次内不再读模板
#[derive(Clone)]
pub enum GrantTemplate {
    Coupon(CouponTemplate),
    GiftCard(GiftCardTemplate),
}

#[derive(Clone)]
pub struct DistributionService {
    pool: DbPool,
    segments: SegmentService,
}

impl DistributionService {
    pub fn new(pool: DbPool) -> Self {
        let segments = SegmentService::new(pool.clone());
        Self { pool, segments }
    }

    /// 活动入口：解析模板与目标集，再走批量分发
    pub async fn run_campaign(&self, request: &DistributeRequest) -> AppResult<DistributionReport> {
        if request.targets.is_empty() {
            return Err(AppError::ValidationError(
                "At least one distribution target is required".to_string(),
            ));
        }

        let grant = match request.kind {
            RewardKind::Coupon => {
                template_service::coupon_template_by_id(&self.pool, request.grant_id)
                    .await?
                    .map(GrantTemplate::Coupon)
            }
            RewardKind::Giftcard => {
                template_service::gift_card_template_by_id(&self.pool, request.grant_id)
                    .await?
                    .map(GrantTemplate::GiftCard)
            }
        }
        .ok_or_else(|| AppError::NotFound("Grant template not found".to_string()))?;

        let mut user_ids: Vec<i64> = self.segments.resolve(&request.targets).await?.into_iter().collect();
        // 排序只为批次划分稳定，集合本身与规则顺序无关
        user_ids.sort_unstable();

        self.distribute(&grant, &user_ids).await
    }

    pub async fn distribute(
        &self,
        grant: &GrantTemplate,
        user_ids: &[i64],
    ) -> AppResult<DistributionReport> {
        // 空目标集直接零计数成功，不产生任何写入
        if user_ids.is_empty() {
            return Ok(DistributionReport {
                distributed_count: 0,
                failed_chunks: Vec::new(),
            });
        }

        let chunk_futures = user_ids
            .chunks(MAX_BATCH_WRITES)
            .map(|chunk| {
                let pool = self.pool.clone();
                let grant = grant.clone();
                let chunk = chunk.to_vec();
                async move { issue_chunk(&pool, &grant, &chunk).await }
            })
            .collect::<Vec<_>>();

        let results = join_all(chunk_futures).await;

        let mut distributed_count = 0i64;
        let mut failed_chunks = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            let size = user_ids
                .chunks(MAX_BATCH_WRITES)
                .nth(index)
                .map_or(0, |chunk| chunk.len());
            match result {
                Ok(count) => distributed_count += count as i64,
                Err(e) => {
                    log::error!("Distribution chunk {index} failed: {e}");
                    failed_chunks.push(ChunkFailure {
                        chunk_index: index,
                        size,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(DistributionReport {
            distributed_count,
            failed_chunks,
        })
    }
}

/// 一个批次 = 一个事务：每个用户一条实例记录，整批要么都提交要么都不提交
async fn issue_chunk(pool: &DbPool, grant: &GrantTemplate, user_ids: &[i64]) -> AppResult<u64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for &user_id in user_ids {
        match grant {
            GrantTemplate::Coupon(template) => {
                let record = issuer::issue_coupon(user_id, template, None, SOURCE_CAMPAIGN, now);
                template_service::insert_user_coupon(&mut *tx, &record).await?;
            }
            GrantTemplate::GiftCard(template) => {
                let record = issuer::issue_gift_card(user_id, template, SOURCE_CAMPAIGN, now);
                template_service::insert_user_gift_card(&mut *tx, &record).await?;
            }
        }
    }

    tx.commit().await?;
    Ok(user_ids.len() as u64)
}
