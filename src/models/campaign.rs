use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::reward::RewardKind;

/// 分发目标的声明式规则。多条规则并存时取并集去重；
/// 只要出现 all，其余规则全部冗余
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionTarget {
    /// 全量用户
    All,
    /// 最近 7 天注册的用户
    New,
    /// 按角色圈选
    Role { roles: Vec<String> },
    /// 显式用户 ID 列表
    Specific { user_ids: Vec<i64> },
    /// 持有指定周期卡的用户
    Pass { pass_name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistributeRequest {
    pub grant_id: i64,
    pub kind: RewardKind,
    pub targets: Vec<DistributionTarget>,
}

/// 单个批次的失败记录；已提交的批次不会因此回滚
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChunkFailure {
    pub chunk_index: usize,
    pub size: usize,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistributionReport {
    pub distributed_count: i64,
    pub failed_chunks: Vec<ChunkFailure>,
}

impl DistributionReport {
    pub fn fully_succeeded(&self) -> bool {
        self.failed_chunks.is_empty()
    }
}
