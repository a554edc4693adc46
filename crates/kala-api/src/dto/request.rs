//! 请求 DTO 定义
//!
//! 结构校验使用 validator，业务校验（授课方式、档位等）在核心层完成

use chrono::NaiveDate;
use kala_core::{EnquiryInput, ExhibitionInput};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// 提交课程咨询请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEnquiryRequest {
    #[validate(length(min = 1, max = 100, message = "艺术类别不能为空"))]
    pub art_type: String,
    #[validate(length(min = 1, max = 50, message = "水平不能为空"))]
    pub skill_level: String,
    #[validate(length(min = 1, max = 50, message = "课程时长不能为空"))]
    pub duration: String,
    #[validate(length(min = 1, max = 50, message = "预算区间不能为空"))]
    pub budget_range: String,
    #[validate(length(min = 1, max = 20, message = "授课方式不能为空"))]
    pub class_type: String,
    #[validate(length(max = 200))]
    pub user_location: Option<String>,
}

impl From<SubmitEnquiryRequest> for EnquiryInput {
    fn from(req: SubmitEnquiryRequest) -> Self {
        Self {
            art_type: req.art_type,
            skill_level: req.skill_level,
            duration: req.duration,
            budget_range: req.budget_range,
            class_type: req.class_type,
            user_location: req.user_location,
        }
    }
}

/// 揭示联系方式请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RevealContactRequest {
    pub enquiry_id: Uuid,
    #[validate(length(min = 1, message = "艺术家 ID 不能为空"))]
    pub artist_id: String,
}

/// 创建展览请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExhibitionRequest {
    #[validate(length(min = 1, max = 200, message = "展览名称长度必须在1-200个字符之间"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub artwork_ids: Vec<String>,
    pub exhibition_type: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "平台费不能为负数"))]
    pub voluntary_platform_fee: f64,
}

impl From<CreateExhibitionRequest> for ExhibitionInput {
    fn from(req: CreateExhibitionRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            artwork_ids: req.artwork_ids,
            exhibition_type: req.exhibition_type,
            voluntary_platform_fee: req.voluntary_platform_fee,
        }
    }
}

/// 展览审核请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveExhibitionRequest {
    pub exhibition_id: Uuid,
    pub approved: bool,
}

/// 展览报价查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteQuery {
    pub exhibition_type: Option<String>,
    pub artwork_count: usize,
}
