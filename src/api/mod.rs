// ==========================================
// 针织样品生产跟踪 - API 层
// ==========================================
// 职责: 提供样品建档与查询接口，统一错误文案
// ==========================================

pub mod error;
pub mod sample_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use sample_api::{KnittingView, SampleApi, SampleOverview, SampleSummary};
