//! REST API Module
//!
//! Contains HTTP handlers, DTOs, and middleware for the REST API.

pub mod dto;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::application::use_cases::{
    CreateDesignUseCase, DatasetCodecs, DeleteDesignUseCase, EncodeDatasetUseCase, GetActiveDesignsUseCase,
    GetDesignByIdUseCase, LoadDatasetUseCase, PartialUpdateDesignUseCase, PreviewDesignUseCase,
    RefitDesignUseCase, TransformDatasetUseCase,
};
use crate::domain::gateways::{DatasetFetcher, DesignRepository};
use crate::infrastructure::driven_adapters::config::AppConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub create_design_use_case: Arc<CreateDesignUseCase>,
    pub preview_design_use_case: Arc<PreviewDesignUseCase>,
    pub get_design_by_id_use_case: Arc<GetDesignByIdUseCase>,
    pub get_active_designs_use_case: Arc<GetActiveDesignsUseCase>,
    pub refit_design_use_case: Arc<RefitDesignUseCase>,
    pub partial_update_design_use_case: Arc<PartialUpdateDesignUseCase>,
    pub delete_design_use_case: Arc<DeleteDesignUseCase>,
    pub transform_dataset_use_case: Arc<TransformDatasetUseCase>,
    pub load_dataset_use_case: Arc<LoadDatasetUseCase>,
    pub encode_dataset_use_case: Arc<EncodeDatasetUseCase>,
}

impl AppState {
    /// Wire every use case to the given adapters
    #[must_use]
    pub fn new(
        config: AppConfig,
        design_repository: Arc<dyn DesignRepository>,
        dataset_fetcher: Arc<dyn DatasetFetcher>,
        codecs: DatasetCodecs,
    ) -> Self {
        let max_rows = config.limits.max_rows;
        Self {
            config: Arc::new(config),
            create_design_use_case: Arc::new(CreateDesignUseCase::new(design_repository.clone())),
            preview_design_use_case: Arc::new(PreviewDesignUseCase::new()),
            get_design_by_id_use_case: Arc::new(GetDesignByIdUseCase::new(design_repository.clone())),
            get_active_designs_use_case: Arc::new(GetActiveDesignsUseCase::new(design_repository.clone())),
            refit_design_use_case: Arc::new(RefitDesignUseCase::new(design_repository.clone())),
            partial_update_design_use_case: Arc::new(PartialUpdateDesignUseCase::new(design_repository.clone())),
            delete_design_use_case: Arc::new(DeleteDesignUseCase::new(design_repository.clone())),
            transform_dataset_use_case: Arc::new(TransformDatasetUseCase::new(design_repository)),
            load_dataset_use_case: Arc::new(LoadDatasetUseCase::new(codecs.clone(), dataset_fetcher, max_rows)),
            encode_dataset_use_case: Arc::new(EncodeDatasetUseCase::new(codecs)),
        }
    }
}

/// Build the application router with its middleware stack
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.limits.max_body_bytes;

    Router::new()
        .nest("/designs", handlers::designs::router())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
