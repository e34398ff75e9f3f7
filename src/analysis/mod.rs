pub mod service;

pub use service::{
    AnalysisPipeline, AnalysisReport, AnalysisRequest, AnalysisService, analyse,
    create_analysis_pipeline,
};
