// ==========================================
// 针织样品生产跟踪 - 样品 API
// ==========================================
// 职责: 样品建档、样品列表、单个样品的汇总视图
// 说明: 写入工作流走 SampleWorkflowEngine，这里只做建档与只读查询
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{ColorMatching, PanelMeasurement, ProcessRecord, Rsn, Sample, Totals};
use crate::engine::repositories::SampleRepositories;
use serde::{Deserialize, Serialize};

/// 样品列表行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub rsn: Rsn,
    pub article_no: String,
    pub total: Totals,
}

/// 针织明细展示（只含非零衣片）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnittingView {
    pub size: String,
    pub panels: Vec<(String, PanelMeasurement)>,
    pub total: Totals,
}

/// 单个样品的汇总视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleOverview {
    pub sample: Sample,
    pub processes: Vec<ProcessRecord>,
    pub knitting: Option<KnittingView>,
    pub color_matchings: Vec<ColorMatching>,
}

// ==========================================
// SampleApi
// ==========================================
pub struct SampleApi {
    repos: SampleRepositories,
}

impl SampleApi {
    pub fn new(repos: SampleRepositories) -> Self {
        Self { repos }
    }

    /// 新建样品档案
    ///
    /// # 参数
    /// - rsn: 样品号（正整数）
    /// - article_no: 款号（可为空）
    pub async fn create_sample(&self, rsn: Rsn, article_no: Option<String>) -> ApiResult<Sample> {
        if rsn <= 0 {
            return Err(ApiError::InvalidInput {
                field: "RSN".to_string(),
                message: format!("样品号必须为正整数: {}", rsn),
            });
        }
        let article_no = article_no
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        let sample = self
            .repos
            .sample_repo
            .create(Sample::new(rsn, article_no))
            .await?;
        tracing::info!(rsn, "样品已建档");
        Ok(sample)
    }

    /// 样品列表（按 RSN 升序）
    pub async fn list_samples(&self) -> ApiResult<Vec<SampleSummary>> {
        let samples = self.repos.sample_repo.list_all().await?;
        Ok(samples
            .into_iter()
            .map(|s| SampleSummary {
                rsn: s.rsn,
                article_no: s.article_no_display().to_string(),
                total: s.total,
            })
            .collect())
    }

    /// 单个样品的汇总视图
    pub async fn get_sample_overview(&self, rsn: Rsn) -> ApiResult<SampleOverview> {
        let sample = self
            .repos
            .sample_repo
            .find_by_rsn(rsn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("sample(rsn={})", rsn)))?;

        let processes = self.repos.process_repo.find_by_rsn(rsn).await?;
        let knitting = self
            .repos
            .knitting_repo
            .find_by_rsn(rsn)
            .await?
            .map(|detail| KnittingView {
                size: detail.size.clone(),
                panels: detail
                    .non_zero_panels()
                    .into_iter()
                    .map(|(name, m)| (name.to_string(), m.clone()))
                    .collect(),
                total: detail.total(),
            });
        let color_matchings = self.repos.color_repo.find_by_rsn(rsn).await?;

        Ok(SampleOverview {
            sample,
            processes,
            knitting,
            color_matchings,
        })
    }
}
