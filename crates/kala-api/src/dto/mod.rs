//! 数据传输对象

pub mod request;
pub mod response;

pub use request::{
    ApproveExhibitionRequest, CreateExhibitionRequest, FeeQuoteQuery, RevealContactRequest,
    SubmitEnquiryRequest,
};
pub use response::{ApiResponse, ApprovalResponse};
